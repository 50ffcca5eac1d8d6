mod cube_report;

pub use cube_report::{CubeReport, CubeSummary, EdgeVertex, TriangleSummary};
