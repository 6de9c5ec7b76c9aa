use std::io::{self, Write};

/// Renders emitted lines to an output sink.
///
/// Prefixes are colon-separated, filename first, then line number, then the
/// line itself. Stdin has no name and never gets a filename prefix; the
/// name-only modes label it `(standard input)`.
#[derive(Debug)]
pub struct Printer<W: Write> {
    out: W,
    show_filename: bool,
    line_numbers: bool,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, show_filename: bool, line_numbers: bool) -> Self {
        Printer {
            out,
            show_filename,
            line_numbers,
        }
    }

    /// Emits a match or context line.
    pub fn line(&mut self, name: Option<&str>, line_no: usize, text: &str) -> io::Result<()> {
        let name = if self.show_filename { name } else { None };
        match (name, self.line_numbers) {
            (Some(name), true) => writeln!(self.out, "{name}:{line_no}:{text}"),
            (Some(name), false) => writeln!(self.out, "{name}:{text}"),
            (None, true) => writeln!(self.out, "{line_no}:{text}"),
            (None, false) => writeln!(self.out, "{text}"),
        }
    }

    /// Emits a per-source match count.
    pub fn count(&mut self, name: Option<&str>, count: usize) -> io::Result<()> {
        match name.filter(|_| self.show_filename) {
            Some(name) => writeln!(self.out, "{name}:{count}"),
            None => writeln!(self.out, "{count}"),
        }
    }

    /// Emits just the source's name, for the files-with(out)-matches modes.
    pub fn source_name(&mut self, name: Option<&str>) -> io::Result<()> {
        writeln!(self.out, "{}", name.unwrap_or("(standard input)"))
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(show_filename: bool, line_numbers: bool) -> String {
        let mut printer = Printer::new(Vec::new(), show_filename, line_numbers);
        printer.line(Some("notes.txt"), 7, "a match").unwrap();
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test]
    fn prefix_matrix() {
        assert_eq!(render(true, true), "notes.txt:7:a match\n");
        assert_eq!(render(true, false), "notes.txt:a match\n");
        assert_eq!(render(false, true), "7:a match\n");
        assert_eq!(render(false, false), "a match\n");
    }

    #[test]
    fn stdin_lines_never_carry_a_filename() {
        let mut printer = Printer::new(Vec::new(), true, true);
        printer.line(None, 3, "x").unwrap();
        assert_eq!(printer.get_ref().as_slice(), b"3:x\n");
    }

    #[test]
    fn counts_follow_the_filename_rule() {
        let mut printer = Printer::new(Vec::new(), true, false);
        printer.count(Some("a.txt"), 3).unwrap();
        printer.count(None, 2).unwrap();
        assert_eq!(printer.get_ref().as_slice(), b"a.txt:3\n2\n");

        let mut printer = Printer::new(Vec::new(), false, false);
        printer.count(Some("a.txt"), 3).unwrap();
        assert_eq!(printer.get_ref().as_slice(), b"3\n");
    }

    #[test]
    fn source_names_label_stdin() {
        let mut printer = Printer::new(Vec::new(), false, false);
        printer.source_name(Some("b.txt")).unwrap();
        printer.source_name(None).unwrap();
        assert_eq!(printer.get_ref().as_slice(), b"b.txt\n(standard input)\n");
    }
}
