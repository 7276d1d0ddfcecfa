use super::*;

#[test]
fn test_bpt_node() {
    let mut node: Node<u32> = Node::new(NodeType::Leaf, 3);
    assert_eq!(node.is_leaf(), true);
    assert_eq!(node.is_internal(), false);
    assert_eq!(node.num_keys(), 0);

    node.keys = vec![10, 20, 30];
    node.child_ptrs = vec![0, 1, 2];
    node.deleted = vec![false, true, false];

    assert_eq!(node.leaf_search(&20), Some(1));
    assert_eq!(node.leaf_search(&15), None);
    assert_eq!(node.entry_at(1).unwrap(), 1);
    assert_eq!(node.entry_at(3).is_err(), true);
    node.validate().unwrap();

    let mut node: Node<u32> = Node::new(NodeType::Internal, 3);
    node.keys = vec![10, 20];
    node.child_ptrs = vec![0, 1, 2];
    assert_eq!(node.child_of(&5), 0);
    // equivalent keys route right
    assert_eq!(node.child_of(&10), 1);
    assert_eq!(node.child_of(&15), 1);
    assert_eq!(node.child_of(&25), 2);
    assert_eq!(node.entry_at(0).is_err(), true);

    node.keys = vec![20, 10];
    assert_eq!(node.validate().is_err(), true);
}
