/// Single-cell backtracking out of contradictions
pub mod backtrack;
/// Compact tile sets for cell options and adjacency rules
pub mod bitset;
/// Cell state, collapse, narrowing and history
pub mod cell;
/// Solver loop orchestration and run reporting
pub mod executor;
/// Collapse propagation to neighboring cells
pub mod propagation;
/// Seeded random choices and lowest-entropy cell selection
pub mod selection;
