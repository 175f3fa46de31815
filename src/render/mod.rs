/// RGB8 bitmap type.
pub mod frame;
/// Rolling history of captured frames.
pub mod ring;
