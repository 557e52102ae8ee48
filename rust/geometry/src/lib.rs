//! BoxClip Geometry
//!
//! Encodes oriented boxes into clip quads, groups them into the seven clip
//! categories and evaluates per-consumer override sets each tick, using
//! nalgebra for transformations.

pub mod category;
pub mod error;
pub mod evaluator;
pub mod frame;
pub mod oriented_box;
pub mod quad;
pub mod scene;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3, Vector4};

pub use category::{Category, CategoryQuads, CategorySet};
pub use error::{Error, Result};
pub use evaluator::{
    evaluate_consumer, Alignment, ClipOverrides, ClipSettings, ClipStateEvaluator, Consumer,
    ConsumerId, OverrideValue, TickReport,
};
pub use frame::Frame;
pub use oriented_box::OrientedBox;
pub use quad::{encode_box, BoxQuads, ClipQuad, EncodeSettings, NORMAL_EPSILON};
pub use scene::{BoxContainer, ClipScene, ReconcileReport};
