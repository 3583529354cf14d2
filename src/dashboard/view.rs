use std::fmt;

pub const TITLE: &str = "Welcome to the Dashboard";

/// The dashboard markup. It never depends on the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View;

impl View {
    pub fn title(&self) -> &'static str {
        TITLE
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<div>")?;
        writeln!(f, "    <h1>{}</h1>", self.title())?;
        write!(f, "</div>")
    }
}
