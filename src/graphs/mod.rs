pub mod bfs;
pub mod edges;
pub mod forward;
pub mod frontier;
pub mod node;
pub mod options;
pub mod random;
pub mod traversal;
pub mod unweighted;
pub mod vertex;
pub mod vertices;
pub mod visited;
pub mod weighted;
pub mod worklist;
