use std::io::Write;

use super::domain::StoredRecord;

const HEADER: [&str; 8] = [
    "num",
    "date",
    "location",
    "gpsCoordinates",
    "typeOfActivity",
    "species",
    "remarks",
    "name",
];

/// Write records as CSV with a header row, returning how many records were written.
pub fn write_csv<W: Write>(records: &[StoredRecord], writer: W) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;
    for record in records {
        csv_writer.write_record([
            &record.num,
            &record.date,
            &record.location,
            &record.gps_coordinates,
            &record.type_of_activity,
            &record.species,
            &record.remarks,
            &record.name,
        ])?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}
