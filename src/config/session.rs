/// Session configuration constants.
///
/// Parameters for per-connection state: the outgoing data queue and the
/// frame size the codec will accept.
pub const MAX_DATA_QUEUE_SIZE: usize = 1000;

/// Upper bound on a single decoded frame body, in bytes. Frames whose
/// length prefix exceeds this are rejected before any buffering.
pub const MAX_FRAME_SIZE: usize = 64 * 1024;
