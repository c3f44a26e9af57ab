//! Built-in datasets for easy testing and experimentation.
use std::env;
use std::fs::{create_dir_all, rename, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv;
use failure;
use reqwest;

use data::{Rating, Ratings};

/// Dataset error types.
#[derive(Debug, Fail)]
pub enum DatasetError {
    /// Can't find the home directory.
    #[fail(display = "Cannot find home directory.")]
    NoHomeDir,
}

fn create_data_dir() -> Result<PathBuf, failure::Error> {
    let path = env::home_dir()
        .ok_or_else(|| DatasetError::NoHomeDir)?
        .join(".cfrec");

    if !path.exists() {
        create_dir_all(&path)?;
    }

    Ok(path)
}

fn download(url: &str, dest_filename: &Path) -> Result<Ratings, failure::Error> {
    let data_dir = create_data_dir()?;
    let desired_filename = data_dir.join(dest_filename);
    let temp_filename = env::temp_dir().join(dest_filename);

    if !desired_filename.exists() {
        let file = File::create(&temp_filename)?;
        let mut writer = BufWriter::new(file);

        let mut response = reqwest::get(url)?;
        response.copy_to(&mut writer)?;

        rename(temp_filename, &desired_filename)?;
    }

    // MovieLens 100K ships tab-separated (user, item, rating,
    // timestamp) records without a header row.
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(desired_filename)?;
    let ratings: Vec<Rating> = reader.deserialize().collect::<Result<Vec<_>, _>>()?;

    Ok(Ratings::from(ratings))
}

/// Download the Movielens 100K ratings and return them.
///
/// The data is stored in `~/.cfrec/`.
pub fn download_movielens_100k() -> Result<Ratings, failure::Error> {
    download(
        "https://files.grouplens.org/datasets/movielens/ml-100k/u.data",
        Path::new("movielens_100k.tsv"),
    )
}
