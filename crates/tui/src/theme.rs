use ratatui::style::Color;

pub struct Theme {
    pub border: Color,
    pub prompt: Color,
    pub statement: Color,
    pub statement_highlighted: Color,
    pub output_highlighted: Color,
    pub banner: Color,
    pub error: Color,
    pub hint: Color,
}

pub const THEME: Theme = Theme {
    border: Color::Cyan,
    prompt: Color::Green,
    statement: Color::White,
    statement_highlighted: Color::LightBlue,
    output_highlighted: Color::LightYellow,
    banner: Color::Magenta,
    error: Color::Red,
    hint: Color::DarkGray,
};
