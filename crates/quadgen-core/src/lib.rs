pub mod error;
pub mod expr;
pub mod parser;
pub mod record;
pub mod sample;
pub mod token;

pub use error::{QuadError, QuadResult};
pub use expr::{BinOp, Equation, Expr};
pub use parser::parse_equation;
pub use record::{verify_vertex, KeyFeatures, KeyPoints, QuestionRecord, VERTEX_TOLERANCE};
pub use sample::{plot_half_width, sample_curve, DEFAULT_HALF_WIDTH, DEFAULT_SAMPLES};
