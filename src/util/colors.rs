use ratatui::style::Color;

pub const PRIMARY: Color = Color::from_u32(0x00d98a4a);
pub const SECONDARY: Color = Color::from_u32(0x008a5a2e);
pub const NEUTRAL: Color = Color::from_u32(0x00565656);
pub const BACKGROUND: Color = Color::from_u32(0x00101010);
pub const ACCENT: Color = Color::from_u32(0x0087b8d4);
