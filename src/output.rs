use crate::drive::File;
use nu_ansi_term::{Color, Style};
use std::io::{self, Write};

/// Writes entries for humans, optionally with terminal colors
#[derive(Copy, Clone, Debug, Default)]
pub struct Printer {
    colored: bool,
}

impl Printer {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    #[inline]
    fn paint(&self, style: Style, s: &str) -> String {
        if self.colored {
            style.paint(s).to_string()
        } else {
            s.to_owned()
        }
    }

    fn name(&self, file: &File) -> String {
        let style = if file.is_folder() {
            Color::Blue.bold()
        } else {
            Style::new()
        };
        self.paint(style, &file.name)
    }

    /// One line per entry of a recursive walk, indented by depth
    pub fn walk_entry(&self, out: &mut impl Write, file: &File, depth: usize) -> io::Result<()> {
        writeln!(
            out,
            "{:indent$}{}  {}  {}",
            "",
            self.name(file),
            self.paint(Color::DarkGray.normal(), &file.id),
            self.paint(Color::Cyan.normal(), &file.mime_type),
            indent = depth * 2,
        )
    }

    pub fn page_token(&self, out: &mut impl Write, token: Option<&str>) -> io::Result<()> {
        writeln!(
            out,
            "page token: {}",
            self.paint(Color::Yellow.normal(), token.unwrap_or("<none>"))
        )
    }

    pub fn entry(&self, out: &mut impl Write, file: &File) -> io::Result<()> {
        writeln!(out, "{}", self.name(file))?;
        writeln!(out, "  id: {}", file.id)?;
        writeln!(out, "  parents: {}", file.parents.join(", "))
    }

    /// Like [`Self::entry`], followed by every other attribute as indented JSON
    pub fn entry_details(&self, out: &mut impl Write, file: &File) -> io::Result<()> {
        self.entry(out, file)?;
        writeln!(out, "  type: {}", file.mime_type)?;

        if file.metadata.is_empty() {
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&file.metadata)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

        for line in json.lines() {
            writeln!(out, "  {line}")?;
        }

        Ok(())
    }

    pub fn updated(&self, out: &mut impl Write, file: &File) -> io::Result<()> {
        writeln!(
            out,
            "updated file {}",
            self.paint(Color::Green.normal(), &file.name)
        )
    }
}
