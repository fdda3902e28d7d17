use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use log::warn;
use thiserror::Error;

use crate::evaluator::Evaluator;

#[derive(Debug, Error)]
pub enum WeightsError {
    #[error("failed to read weights file: {0}")]
    Io(#[from] io::Error),
    #[error("weight file holds {found} {kind} tables, this network expects {expected}")]
    TableCount {
        kind: &'static str,
        found: u64,
        expected: usize,
    },
    #[error("weight table of {found} entries does not match the expected {expected}")]
    TableSize { found: u64, expected: usize },
}

impl Evaluator {
    /// Write the weights as a flat little-endian stream: a `u64` table count
    /// followed by the occupant tables, then the stock table, then the tile
    /// block in the same form. Each table is its `u64` length and that many
    /// `f32`s. No header, version or checksum: the layout is the contract
    /// between training runs and play.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        write_u64(&mut writer, self.occupant_tables.len() as u64)?;
        for table in &self.occupant_tables {
            write_table(&mut writer, table)?;
        }
        write_table(&mut writer, &self.stock_table)?;
        write_u64(&mut writer, self.tile_tables.len() as u64)?;
        for table in &self.tile_tables {
            write_table(&mut writer, table)?;
        }
        writer.flush()
    }

    /// Replace this network's weights with the file's contents. The file is
    /// read and every count and size checked before anything is committed, so
    /// a failed load leaves the weights exactly as they were.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), WeightsError> {
        let mut reader = BufReader::new(File::open(path)?);

        let found = read_u64(&mut reader)?;
        if found as usize != self.occupant_tables.len() {
            return Err(WeightsError::TableCount {
                kind: "occupant",
                found,
                expected: self.occupant_tables.len(),
            });
        }
        let mut occupant_tables = Vec::with_capacity(self.occupant_tables.len());
        for table in &self.occupant_tables {
            occupant_tables.push(read_table(&mut reader, table.len())?);
        }

        let stock_table = read_table(&mut reader, self.stock_table.len())?;

        let found = read_u64(&mut reader)?;
        if found as usize != self.tile_tables.len() {
            return Err(WeightsError::TableCount {
                kind: "tile",
                found,
                expected: self.tile_tables.len(),
            });
        }
        let mut tile_tables = Vec::with_capacity(self.tile_tables.len());
        for table in &self.tile_tables {
            tile_tables.push(read_table(&mut reader, table.len())?);
        }

        self.occupant_tables = occupant_tables;
        self.stock_table = stock_table;
        self.tile_tables = tile_tables;
        Ok(())
    }

    /// Load from `path`, falling back to untrained tables with a logged
    /// warning instead of failing. Callers who must know use `load`.
    pub fn load_or_default(path: impl AsRef<Path>) -> Evaluator {
        let mut evaluator = Evaluator::default();
        if let Err(err) = evaluator.load(&path) {
            warn!(
                "could not load weights from {}: {err}; playing with untrained tables",
                path.as_ref().display()
            );
        }
        evaluator
    }
}

fn write_u64<W: Write>(writer: &mut W, value: u64) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

fn write_table<W: Write>(writer: &mut W, table: &[f32]) -> io::Result<()> {
    write_u64(writer, table.len() as u64)?;
    for &value in table {
        writer.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

fn read_u64<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_table<R: Read>(reader: &mut R, expected: usize) -> Result<Vec<f32>, WeightsError> {
    let found = read_u64(reader)?;
    if found as usize != expected {
        return Err(WeightsError::TableSize { found, expected });
    }
    let mut table = Vec::with_capacity(expected);
    let mut buf = [0u8; 4];
    for _ in 0..expected {
        reader.read_exact(&mut buf)?;
        table.push(f32::from_le_bytes(buf));
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use contrast::Game;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("contrast-{}-{name}.bin", std::process::id()))
    }

    fn trained() -> Evaluator {
        let mut evaluator = Evaluator::default();
        let mut game = Game::default();
        for i in 0..8 {
            evaluator.td_update(&game, 0.25 * i as f32 - 0.9, 0.5);
            let moves = game.possible_moves();
            game.play(moves[i * 11 % moves.len()]).unwrap();
        }
        evaluator
    }

    fn sample_positions() -> Vec<Game> {
        let mut positions = vec![Game::default()];
        let mut game = Game::default();
        for i in 0..6 {
            let moves = game.possible_moves();
            game.play(moves[i * 13 % moves.len()]).unwrap();
            positions.push(game);
        }
        positions
    }

    #[test]
    fn round_trip_is_bit_exact() {
        let path = temp_path("round-trip");
        let saved = trained();
        saved.save(&path).unwrap();

        let mut loaded = Evaluator::default();
        loaded.load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        for game in sample_positions() {
            assert_eq!(
                saved.evaluate(&game).to_bits(),
                loaded.evaluate(&game).to_bits()
            );
        }
    }

    #[test]
    fn table_count_mismatch_is_reported_and_harmless() {
        let path = temp_path("count-mismatch");
        let mut bytes = 3u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0; 64]);
        fs::write(&path, bytes).unwrap();

        let mut evaluator = Evaluator::default();
        let err = evaluator.load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, WeightsError::TableCount { found: 3, .. }));
        // untouched: still evaluates like a fresh network
        assert_eq!(
            evaluator.evaluate(&Game::default()).to_bits(),
            Evaluator::default().evaluate(&Game::default()).to_bits()
        );
    }

    #[test]
    fn truncated_file_is_reported_and_harmless() {
        let path = temp_path("truncated");
        trained().save(&path).unwrap();
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        let mut evaluator = Evaluator::default();
        let err = evaluator.load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, WeightsError::Io(_)));
        assert_eq!(
            evaluator.evaluate(&Game::default()).to_bits(),
            Evaluator::default().evaluate(&Game::default()).to_bits()
        );
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let evaluator = Evaluator::load_or_default("/nonexistent/contrast-weights.bin");
        assert_eq!(evaluator.num_weights(), Evaluator::default().num_weights());
    }
}
