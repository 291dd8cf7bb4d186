/// Rebuild the route `base -> ... -> quote` from a predecessor table.
///
/// `predecessors[v]` holds the vertex `v` was last improved from. Returns
/// `None` when the chain from `quote` never reaches `base`.
pub fn reconstruct(predecessors: &[Option<usize>], base: usize, quote: usize) -> Option<Vec<usize>> {
    let mut path = vec![quote];
    let mut current = quote;
    while current != base {
        current = predecessors.get(current).copied().flatten()?;
        // a chain longer than the vertex count has looped
        if path.len() > predecessors.len() {
            return None;
        }
        path.push(current);
    }
    path.reverse();
    Some(path)
}
