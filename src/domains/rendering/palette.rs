use crate::domains::trajectory::AgentId;
use image::Rgba;

/// Qualitative "Set1" palette.
pub const SET1: [[u8; 4]; 9] = [
    [0xE4, 0x1A, 0x1C, 0xFF], // red
    [0x37, 0x7E, 0xB8, 0xFF], // blue
    [0x4D, 0xAF, 0x4A, 0xFF], // green
    [0x98, 0x4E, 0xA3, 0xFF], // purple
    [0xFF, 0x7F, 0x00, 0xFF], // orange
    [0xFF, 0xFF, 0x33, 0xFF], // yellow
    [0xA6, 0x56, 0x28, 0xFF], // brown
    [0xF7, 0x81, 0xBF, 0xFF], // pink
    [0x99, 0x99, 0x99, 0xFF], // grey
];

/// Label color for an agent; cycles through [`SET1`].
pub fn agent_color(agent_id: AgentId) -> Rgba<u8> {
    Rgba(SET1[agent_id as usize % SET1.len()])
}

/// Label offset as a fraction of `(cell_width, cell_height)`, in image space
/// (y grows downward). Four directions keyed by `agent_id % 4`; this only
/// spreads labels apart, it does not resolve collisions.
pub fn label_offset(agent_id: AgentId) -> (f64, f64) {
    match agent_id % 4 {
        0 => (1.0 / 4.0, 0.0),
        1 => (0.0, -1.0 / 6.0),
        2 => (-1.0 / 6.0, 0.0),
        _ => (0.0, 1.0 / 4.0),
    }
}
