//! Image export of a computed frame.
//!
//! Writes plain-text PPM (P3), one image row per display row, so a
//! frame can be inspected without a terminal.

use std::io::{self, Write};

use crate::model::Rgb;

/// Color of the cells past the end of the last row.
pub const PADDING: Rgb = Rgb::grey(128);

/// Writes `pixels` as a P3 image `row_len` pixels wide.
///
/// A partial last row is padded with `PADDING`. An empty frame
/// produces a 0x0 image.
pub fn write_ppm<W: Write>(out: &mut W, pixels: &[Rgb], row_len: usize) -> io::Result<()> {
    let row_len = row_len.max(1);
    let (width, height) = if pixels.is_empty() {
        (0, 0)
    } else {
        (row_len, pixels.len().div_ceil(row_len))
    };

    writeln!(out, "P3")?;
    writeln!(out, "{} {}", width, height)?;
    writeln!(out, "255")?;

    for row in pixels.chunks(row_len) {
        let mut line = String::with_capacity(row_len * 12);
        for (i, px) in row
            .iter()
            .chain(std::iter::repeat(&PADDING).take(row_len - row.len()))
            .enumerate()
        {
            if i > 0 {
                line.push(' ');
            }
            line.push_str(&format!("{} {} {}", px.r, px.g, px.b));
        }
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(pixels: &[Rgb], row_len: usize) -> String {
        let mut buf = Vec::new();
        write_ppm(&mut buf, pixels, row_len).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        let pixels = [Rgb::new(255, 0, 0), Rgb::grey(0), Rgb::grey(10), Rgb::new(0, 0, 255)];
        let text = render(&pixels, 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "P3");
        assert_eq!(lines[1], "2 2");
        assert_eq!(lines[2], "255");
        assert_eq!(lines[3], "255 0 0 0 0 0");
        assert_eq!(lines[4], "10 10 10 0 0 255");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_last_row_is_padded() {
        let pixels = [Rgb::grey(1), Rgb::grey(2), Rgb::grey(3)];
        let text = render(&pixels, 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "2 2");
        assert_eq!(lines[4], "3 3 3 128 128 128");
    }

    #[test]
    fn test_empty_frame() {
        let text = render(&[], 8);
        assert_eq!(text, "P3\n0 0\n255\n");
    }
}
