use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind},
    path::Path,
};

use crate::instance::TspInstance;

pub type Result<T> = std::io::Result<T>;

/// Reads the plain coordinate format: an optional block of `c ...` comment
/// lines, a header `p tsp <n>`, then `n` lines with the `x y` coordinates of
/// one city each.
pub trait TspInstanceReader: Sized {
    fn try_read_tsp<R: BufRead>(reader: R) -> Result<Self>;
    fn try_read_tsp_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(std::io::Error::new($kind, $info));
        }
    };
}

macro_rules! parse_next_value {
    ($iterator : expr, $name : expr) => {{
        let next = $iterator.next();
        raise_error_unless!(
            next.is_some(),
            ErrorKind::InvalidData,
            format!("Premature end of line when parsing {}.", $name)
        );

        let parsed = next.unwrap().parse();
        raise_error_unless!(
            parsed.is_ok(),
            ErrorKind::InvalidData,
            format!("Invalid value found. Cannot parse {}.", $name)
        );

        parsed.unwrap()
    }};
}

impl TspInstanceReader for TspInstance {
    fn try_read_tsp<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader
            .lines()
            .filter(|l| !matches!(l, Ok(line) if line.starts_with('c')));

        let header = match lines.next() {
            None => {
                return Err(std::io::Error::new(
                    ErrorKind::InvalidData,
                    "Missing header line.",
                ));
            }
            Some(line) => line?,
        };

        let mut tokens = header.split_ascii_whitespace();
        raise_error_unless!(
            tokens.next() == Some("p") && tokens.next() == Some("tsp"),
            ErrorKind::InvalidData,
            "Header must start with 'p tsp'."
        );
        let number_of_nodes: usize = parse_next_value!(tokens, "number of nodes");

        let mut points = Vec::with_capacity(number_of_nodes);
        for line in lines {
            let line = line?;
            let mut tokens = line.split_ascii_whitespace();

            let x: f64 = parse_next_value!(tokens, "x coordinate");
            let y: f64 = parse_next_value!(tokens, "y coordinate");
            points.push((x, y));
        }

        raise_error_unless!(
            points.len() == number_of_nodes,
            ErrorKind::InvalidData,
            format!(
                "Header announced {} cities but {} coordinate lines followed.",
                number_of_nodes,
                points.len()
            )
        );

        Ok(TspInstance::from_points(&points))
    }

    fn try_read_tsp_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = File::open(path)?;
        Self::try_read_tsp(BufReader::new(reader))
    }
}
