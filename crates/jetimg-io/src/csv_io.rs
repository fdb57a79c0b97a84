use jetimg_core::{JetImageError, JetImageResult};
use jetimg_kinematics::Jet;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column naming of a jet table: `{prefix}{slot}` per four-vector component,
/// plus one 0/1 label column. Other columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvLayout {
    pub energy_prefix: String,
    pub px_prefix: String,
    pub py_prefix: String,
    pub pz_prefix: String,
    pub label_column: String,
}

impl Default for CsvLayout {
    fn default() -> Self {
        CsvLayout {
            energy_prefix: "E_".to_string(),
            px_prefix: "PX_".to_string(),
            py_prefix: "PY_".to_string(),
            pz_prefix: "PZ_".to_string(),
            label_column: "is_signal_new".to_string(),
        }
    }
}

impl CsvLayout {
    /// Particle columns in slot order: `E_0, PX_0, PY_0, PZ_0, E_1, ...`.
    pub fn particle_columns(&self, slots: usize) -> Vec<String> {
        let prefixes = [
            &self.energy_prefix,
            &self.px_prefix,
            &self.py_prefix,
            &self.pz_prefix,
        ];
        (0..slots)
            .flat_map(|i| prefixes.map(|p| format!("{}{}", p, i)))
            .collect()
    }
}

fn csv_error(e: csv::Error) -> JetImageError {
    JetImageError::Serialization(format!("CSV error: {}", e))
}

/// Streams jets out of a CSV table, one record per jet.
pub struct JetCsvReader<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    names: Vec<String>,
    columns: Vec<usize>,
    label_column: String,
    label: usize,
    slots: usize,
    row: usize,
    values: Vec<f64>,
}

impl JetCsvReader<File> {
    pub fn from_path(
        path: impl AsRef<Path>,
        layout: &CsvLayout,
        slots: usize,
    ) -> JetImageResult<Self> {
        let path = path.as_ref();
        debug!("opening jet table {}", path.display());
        JetCsvReader::from_reader(File::open(path)?, layout, slots)
    }
}

impl<R: Read> JetCsvReader<R> {
    /// Resolve the layout against the header row. Every expected column must
    /// be present: a table with fewer slots than configured is an error.
    pub fn from_reader(reader: R, layout: &CsvLayout, slots: usize) -> JetImageResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = rdr.headers().map_err(csv_error)?.clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| JetImageError::MissingColumn(name.to_string()))
        };

        let names = layout.particle_columns(slots);
        let columns = names
            .iter()
            .map(|n| find(n.as_str()))
            .collect::<JetImageResult<Vec<_>>>()?;
        let label = find(layout.label_column.as_str())?;

        Ok(JetCsvReader {
            records: rdr.into_records(),
            names,
            columns,
            label_column: layout.label_column.clone(),
            label,
            slots,
            row: 0,
            values: Vec::with_capacity(slots * 4),
        })
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Group jets into chunks of at most `size`.
    pub fn chunks(self, size: usize) -> JetChunks<R> {
        JetChunks {
            reader: self,
            size: size.max(1),
            failed: false,
        }
    }

    fn malformed(&self, column: &str, reason: String) -> JetImageError {
        JetImageError::MalformedRecord {
            row: self.row,
            column: column.to_string(),
            reason,
        }
    }

    fn parse_record(&mut self, record: &csv::StringRecord) -> JetImageResult<Jet<f64>> {
        self.values.clear();
        for (name, &idx) in self.names.iter().zip(&self.columns) {
            let field = record.get(idx).unwrap_or("");
            let value: f64 = field
                .parse()
                .map_err(|_| self.malformed(name, format!("'{}' is not a number", field)))?;
            if !value.is_finite() {
                return Err(self.malformed(name, format!("'{}' is not finite", field)));
            }
            self.values.push(value);
        }

        let field = record.get(self.label).unwrap_or("");
        let is_signal = match field.parse::<f64>() {
            Ok(v) if v == 0.0 => false,
            Ok(v) if v == 1.0 => true,
            _ => {
                return Err(self.malformed(
                    &self.label_column,
                    format!("label '{}' is not 0 or 1", field),
                ))
            }
        };

        Jet::from_flat(&self.values, self.slots, is_signal)
    }
}

impl<R: Read> Iterator for JetCsvReader<R> {
    type Item = JetImageResult<Jet<f64>>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(r) => r,
            Err(e) => return Some(Err(csv_error(e))),
        };
        self.row += 1;
        Some(self.parse_record(&record))
    }
}

/// Chunked view over a [`JetCsvReader`]. Stops after the first error.
pub struct JetChunks<R: Read> {
    reader: JetCsvReader<R>,
    size: usize,
    failed: bool,
}

impl<R: Read> Iterator for JetChunks<R> {
    type Item = JetImageResult<Vec<Jet<f64>>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let mut chunk = Vec::with_capacity(self.size);
        while chunk.len() < self.size {
            match self.reader.next() {
                Some(Ok(jet)) => chunk.push(jet),
                Some(Err(e)) => {
                    self.failed = true;
                    return Some(Err(e));
                }
                None => break,
            }
        }
        if chunk.is_empty() {
            None
        } else {
            Some(Ok(chunk))
        }
    }
}

/// Read every jet of a CSV file.
pub fn read_jets(
    path: impl AsRef<Path>,
    layout: &CsvLayout,
    slots: usize,
) -> JetImageResult<Vec<Jet<f64>>> {
    JetCsvReader::from_path(path, layout, slots)?.collect()
}

/// Write jets as a CSV table using `layout`'s column names.
pub fn write_jets(
    path: impl AsRef<Path>,
    jets: &[Jet<f64>],
    layout: &CsvLayout,
) -> JetImageResult<()> {
    let slots = jets.first().map_or(0, |j| j.slots());
    let mut wtr = csv::Writer::from_path(path.as_ref()).map_err(csv_error)?;

    let mut header = layout.particle_columns(slots);
    header.push(layout.label_column.clone());
    wtr.write_record(&header).map_err(csv_error)?;

    for jet in jets {
        jet.check_slots(slots)?;
        let mut row: Vec<String> = jet
            .particles()
            .iter()
            .flat_map(|p| [p.e, p.px, p.py, p.pz])
            .map(|v| v.to_string())
            .collect();
        row.push(jet.label().to_string());
        wtr.write_record(&row).map_err(csv_error)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetimg_kinematics::FourVector;

    fn table(rows: &[&str]) -> String {
        let mut s = String::from("idx,E_0,PX_0,PY_0,PZ_0,E_1,PX_1,PY_1,PZ_1,truthE,is_signal_new\n");
        for r in rows {
            s.push_str(r);
            s.push('\n');
        }
        s
    }

    #[test]
    fn test_particle_columns() {
        let cols = CsvLayout::default().particle_columns(2);
        assert_eq!(cols, vec!["E_0", "PX_0", "PY_0", "PZ_0", "E_1", "PX_1", "PY_1", "PZ_1"]);
    }

    #[test]
    fn test_reads_jets_ignoring_extra_columns() {
        let data = table(&["0,10,3,4,0,5,0,0,0,99,1", "1,8.5,1,1,1,0,0,0,0,99,0.0"]);
        let jets: Vec<Jet<f64>> = JetCsvReader::from_reader(data.as_bytes(), &CsvLayout::default(), 2)
            .unwrap()
            .collect::<JetImageResult<_>>()
            .unwrap();
        assert_eq!(jets.len(), 2);
        assert_eq!(jets[0].leading(), &FourVector::new(10.0, 3.0, 4.0, 0.0));
        assert!(jets[0].is_signal());
        assert!(!jets[1].is_signal());
        assert_eq!(jets[1].n_active(), 1);
    }

    #[test]
    fn test_missing_slot_column_is_an_error() {
        let data = table(&["0,10,3,4,0,5,0,0,0,99,1"]);
        let err = JetCsvReader::from_reader(data.as_bytes(), &CsvLayout::default(), 3).err().unwrap();
        assert!(matches!(err, JetImageError::MissingColumn(ref c) if c == "E_2"));
    }

    #[test]
    fn test_bad_value_names_row_and_column() {
        let data = table(&["0,10,3,4,0,5,0,0,0,99,1", "1,10,x,4,0,5,0,0,0,99,1"]);
        let mut reader = JetCsvReader::from_reader(data.as_bytes(), &CsvLayout::default(), 2).unwrap();
        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(JetImageError::MalformedRecord { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "PX_0");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bad_label_rejected() {
        let data = table(&["0,10,3,4,0,5,0,0,0,99,2"]);
        let mut reader = JetCsvReader::from_reader(data.as_bytes(), &CsvLayout::default(), 2).unwrap();
        assert!(matches!(
            reader.next().unwrap(),
            Err(JetImageError::MalformedRecord { ref column, .. }) if column == "is_signal_new"
        ));
    }

    #[test]
    fn test_chunks() {
        let rows: Vec<String> = (0..7).map(|i| format!("{},10,3,4,0,0,0,0,0,1,{}", i, i % 2)).collect();
        let refs: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
        let data = table(&refs);
        let reader = JetCsvReader::from_reader(data.as_bytes(), &CsvLayout::default(), 2).unwrap();
        let sizes: Vec<usize> = reader.chunks(3).map(|c| c.unwrap().len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
    }

    #[test]
    fn test_chunks_stop_after_error() {
        let data = table(&["0,10,3,4,0,0,0,0,0,1,1", "1,bad,3,4,0,0,0,0,0,1,1", "2,10,3,4,0,0,0,0,0,1,1"]);
        let reader = JetCsvReader::from_reader(data.as_bytes(), &CsvLayout::default(), 2).unwrap();
        let results: Vec<_> = reader.chunks(2).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jets.csv");
        let jets = vec![
            Jet::from_flat(&[10.0, 3.0, 4.0, 0.5, 2.0, 1.0, 0.25, -1.0], 2, true).unwrap(),
            Jet::from_flat(&[7.0, -1.5, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0], 2, false).unwrap(),
        ];
        write_jets(&path, &jets, &CsvLayout::default()).unwrap();
        let back = read_jets(&path, &CsvLayout::default(), 2).unwrap();
        assert_eq!(back, jets);
    }
}
