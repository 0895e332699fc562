//! Comma-separated price input and posterior output
use std::fmt;
use std::io::{Read, Write};

use crate::posterior::Posterior;

/// Failure to load prices
#[derive(Debug)]
pub enum ParseError {
    /// The source could not be read
    Io(std::io::Error),
    /// A token is not a number
    InvalidNumber { ix: usize, token: String },
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Io(err)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::InvalidNumber { .. } => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read prices: {}", err),
            Self::InvalidNumber { ix, token } => {
                write!(f, "price {} is not a number: '{}'", ix, token)
            }
        }
    }
}

/// Parse prices separated by commas and/or whitespace.
///
/// Empty tokens, such as those left by a trailing comma or newline, are
/// skipped. `ix` in [`ParseError::InvalidNumber`] counts non-empty tokens.
///
/// # Example
///
/// ```
/// use supres::io::parse_prices;
///
/// let xs = parse_prices("100.5, 101.25,99\n").unwrap();
/// assert_eq!(xs, vec![100.5, 101.25, 99.0]);
///
/// assert!(parse_prices("100.5,abc").is_err());
/// ```
pub fn parse_prices(text: &str) -> Result<Vec<f64>, ParseError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(ix, token)| {
            token.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                ix,
                token: token.to_owned(),
            })
        })
        .collect()
}

/// Read all of `reader` and parse it with [`parse_prices`]
pub fn read_prices<R: Read>(mut reader: R) -> Result<Vec<f64>, ParseError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_prices(&text)
}

fn write_line<W: Write>(w: &mut W, xs: &[f64]) -> std::io::Result<()> {
    let line = xs
        .iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(",");
    writeln!(w, "{}", line)
}

/// Write the posterior as three comma-separated lines: the level means, the
/// noise variances, and the mixing weights.
pub fn write_posterior<W: Write>(
    mut w: W,
    posterior: &Posterior,
) -> std::io::Result<()> {
    write_line(&mut w, posterior.means())?;
    write_line(&mut w, posterior.variances())?;
    write_line(&mut w, posterior.weights())?;
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::Dirichlet;
    use crate::vb::ComponentParams;

    #[test]
    fn parse_tolerates_whitespace_and_trailing_separators() {
        let xs = parse_prices(" 1.5 ,2,\n3e2,\r\n").unwrap();
        assert_eq!(xs, vec![1.5, 2.0, 300.0]);
    }

    #[test]
    fn parse_empty_text_is_empty() {
        assert!(parse_prices("").unwrap().is_empty());
        assert!(parse_prices(" ,\n").unwrap().is_empty());
    }

    #[test]
    fn parse_reports_bad_token() {
        match parse_prices("1,2,x3") {
            Err(ParseError::InvalidNumber { ix, token }) => {
                assert_eq!(ix, 2);
                assert_eq!(token, "x3");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn read_from_reader() {
        let xs = read_prices("10,20,30".as_bytes()).unwrap();
        assert_eq!(xs, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn writes_three_lines() {
        let params = vec![
            ComponentParams {
                m: 100.0,
                beta: 2.0,
                shape: 3.0,
                rate: 4.0,
            },
            ComponentParams {
                m: 110.5,
                beta: 2.0,
                shape: 2.0,
                rate: 1.0,
            },
        ];
        let mixing = Dirichlet::new(vec![1.0, 3.0]).unwrap();
        let posterior = Posterior::new(params, mixing);

        let mut buf: Vec<u8> = Vec::new();
        write_posterior(&mut buf, &posterior).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text, "100,110.5\n2,1\n0.25,0.75\n");
    }
}
