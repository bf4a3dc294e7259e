/**
 * Static geometry templates and the helpers that move CPU-side geometry into GPU buffers.
 */
pub mod buffers;
pub mod mesh;
