//! Movie and rating file loaders
//!
//! Both files are RFC 4180 CSV with a header line:
//!
//! ```text
//! movieId,title,genres
//! userId,movieId,rating[,timestamp]
//! ```
//!
//! Rows with fewer than three fields are skipped with a warning. Malformed
//! numbers and rows the catalog rejects abort the load.

use cinematch_core::{Catalog, ItemId, Rating, UserId};
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::{IngestError, Result};
use crate::genres::split_genres;

const MIN_FIELDS: usize = 3;

/// What a load added to the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub movies: usize,
    pub ratings: usize,
    /// Distinct raters in the catalog after the load
    pub users: usize,
    /// Ratings for items the catalog does not hold
    pub orphan_ratings: usize,
    pub skipped_rows: usize,
}

impl LoadReport {
    fn absorb(&mut self, other: LoadReport) {
        self.movies += other.movies;
        self.ratings += other.ratings;
        self.users = other.users.max(self.users);
        self.orphan_ratings += other.orphan_ratings;
        self.skipped_rows += other.skipped_rows;
    }
}

/// Load both files into a fresh catalog
pub fn load_dataset(movies: impl AsRef<Path>, ratings: impl AsRef<Path>) -> Result<(Catalog, LoadReport)> {
    let mut catalog = Catalog::new();
    let mut report = load_movies(movies, &mut catalog)?;
    report.absorb(load_ratings(ratings, &mut catalog)?);
    Ok((catalog, report))
}

pub fn load_movies(path: impl AsRef<Path>, catalog: &mut Catalog) -> Result<LoadReport> {
    let path = path.as_ref();
    read_movies(open(path)?, path, catalog)
}

pub fn load_ratings(path: impl AsRef<Path>, catalog: &mut Catalog) -> Result<LoadReport> {
    let path = path.as_ref();
    read_ratings(open(path)?, path, catalog)
}

/// Read `movieId,title,genres` rows; `source` only labels errors and logs
pub fn read_movies<R: Read>(reader: R, source: &Path, catalog: &mut Catalog) -> Result<LoadReport> {
    let mut report = LoadReport::default();

    for_each_row(reader, source, &mut report, |line, record| {
        let id: ItemId = parse_field(source, line, "movieId", &record[0])?;
        let genres = split_genres(&record[2]);
        catalog
            .insert_item(id, &record[1], genres)
            .map_err(|source_err| IngestError::Record {
                path: source.to_path_buf(),
                line,
                source: source_err,
            })?;
        Ok(RowKind::Movie)
    })?;

    info!(
        path = %source.display(),
        movies = report.movies,
        skipped = report.skipped_rows,
        "loaded movies"
    );
    Ok(report)
}

/// Read `userId,movieId,rating` rows; extra columns are ignored
pub fn read_ratings<R: Read>(reader: R, source: &Path, catalog: &mut Catalog) -> Result<LoadReport> {
    let mut report = LoadReport::default();

    for_each_row(reader, source, &mut report, |line, record| {
        let user: UserId = parse_field(source, line, "userId", &record[0])?;
        let item: ItemId = parse_field(source, line, "movieId", &record[1])?;
        let rating: Rating = parse_field(source, line, "rating", &record[2])?;
        catalog
            .record_rating(user, item, rating)
            .map_err(|source_err| IngestError::Record {
                path: source.to_path_buf(),
                line,
                source: source_err,
            })?;
        Ok(if catalog.contains(item) {
            RowKind::Rating
        } else {
            RowKind::OrphanRating
        })
    })?;

    report.users = catalog.ratings().user_count();
    info!(
        path = %source.display(),
        ratings = report.ratings,
        orphans = report.orphan_ratings,
        users = report.users,
        skipped = report.skipped_rows,
        "loaded ratings"
    );
    Ok(report)
}

enum RowKind {
    Movie,
    Rating,
    OrphanRating,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// Rows may be ragged so short ones reach the skip path instead of failing
fn for_each_row<R, F>(reader: R, source: &Path, report: &mut LoadReport, mut row: F) -> Result<()>
where
    R: Read,
    F: FnMut(usize, &StringRecord) -> Result<RowKind>,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    for result in reader.records() {
        let record = result.map_err(|err| IngestError::Csv {
            path: source.to_path_buf(),
            source: err,
        })?;
        let line = record.position().map_or(0, |pos| pos.line() as usize);

        if record.len() < MIN_FIELDS {
            warn!(
                path = %source.display(),
                line,
                fields = record.len(),
                "skipping row with missing fields"
            );
            report.skipped_rows += 1;
            continue;
        }

        match row(line, &record)? {
            RowKind::Movie => report.movies += 1,
            RowKind::Rating => report.ratings += 1,
            RowKind::OrphanRating => {
                report.ratings += 1;
                report.orphan_ratings += 1;
            }
        }
    }
    Ok(())
}

fn parse_field<T: FromStr>(source: &Path, line: usize, field: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| IngestError::Parse {
        path: source.to_path_buf(),
        line,
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_movies_skips_header_and_short_rows() {
        let data = "movieId,title,genres\r\n1,Toy Story (1995),Animation|Comedy\r\n2,Broken\r\n3,\"Heat, The (1995)\",Action\r\n";
        let mut catalog = Catalog::new();
        let report = read_movies(Cursor::new(data), Path::new("movies.csv"), &mut catalog).unwrap();

        assert_eq!(report.movies, 2);
        assert_eq!(report.skipped_rows, 1);
        assert_eq!(catalog.resolve_title("Heat, The (1995)"), Some(3));
        assert_eq!(catalog.item(1).unwrap().genres, vec!["Animation", "Comedy"]);
    }

    #[test]
    fn test_doubled_quotes_keep_literal_quote() {
        let data = "movieId,title,genres\n\
                    4,\"\"\"Great Performances\"\" Cats (1998)\",Musical\n";
        let mut catalog = Catalog::new();
        read_movies(Cursor::new(data), Path::new("movies.csv"), &mut catalog).unwrap();

        assert_eq!(catalog.title_of(4), Some("\"Great Performances\" Cats (1998)"));
        assert_eq!(catalog.item(4).unwrap().genres, vec!["Musical"]);
    }

    #[test]
    fn test_read_ratings_counts_orphans() {
        let mut catalog = Catalog::new();
        catalog.insert_item(1, "One", vec![]).unwrap();
        let data = "userId,movieId,rating,timestamp\n10,1,4.0,964982703\n10,99,3.5,964982703\n11,1,5.0,964982703\n";
        let report = read_ratings(Cursor::new(data), Path::new("ratings.csv"), &mut catalog).unwrap();

        assert_eq!(report.ratings, 3);
        assert_eq!(report.orphan_ratings, 1);
        assert_eq!(report.users, 2);
        assert_eq!(catalog.ratings_of(10).map(|r| r.len()), Some(2));
    }

    #[test]
    fn test_bad_number_reports_line_and_field() {
        let mut catalog = Catalog::new();
        let data = "userId,movieId,rating\n1,1,4.0\n1,x,4.0\n";
        let err = read_ratings(Cursor::new(data), Path::new("ratings.csv"), &mut catalog).unwrap_err();

        assert_eq!(err.line(), Some(3));
        assert!(matches!(err, IngestError::Parse { field: "movieId", .. }));
        assert!(err.to_string().contains("ratings.csv:3"));
    }

    #[test]
    fn test_rejected_rating_is_wrapped() {
        let mut catalog = Catalog::new();
        let data = "userId,movieId,rating\n1,1,7.5\n";
        let err = read_ratings(Cursor::new(data), Path::new("r.csv"), &mut catalog).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Record {
                line: 2,
                source: cinematch_core::Error::RatingOutOfRange { .. },
                ..
            }
        ));
    }
}
