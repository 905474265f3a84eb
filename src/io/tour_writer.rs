use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::exact::Tour;

/// Writes a tour as a `c cost <value>` comment followed by one 1-based node
/// id per line, in visiting order.
pub trait TourWriter {
    fn try_write_tour<W: Write>(&self, writer: W) -> Result<(), std::io::Error>;
    fn try_write_tour_file<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error>;
}

impl TourWriter for Tour {
    fn try_write_tour<W: Write>(&self, mut writer: W) -> Result<(), std::io::Error> {
        writeln!(writer, "c cost {}", self.cost())?;

        for u in self.order() {
            writeln!(writer, "{}", u + 1)?;
        }

        Ok(())
    }

    fn try_write_tour_file<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error> {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_tour(writer)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use regex::Regex;

    #[test]
    fn hard_coded() {
        let tour = Tour::new(vec![0, 2, 1, 3], 42.5);

        let output = {
            let mut buffer: Vec<u8> = Vec::new();
            tour.try_write_tour(&mut buffer).expect("Failed to write");
            String::from_utf8(buffer).unwrap()
        };

        assert!(
            Regex::new(r"c\scost\s42\.5")
                .unwrap()
                .is_match(output.as_str()),
            "Output: {output}"
        );
        assert_eq!(
            output.lines().skip(1).collect::<Vec<_>>(),
            vec!["1", "3", "2", "4"]
        );
    }
}
