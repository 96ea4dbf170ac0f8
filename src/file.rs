/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

//! This module contains some common helper functions for dealing with file I/O

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::CasError;

/// Logs a debug message, the message is only constructed if debug mode is enabled in the configuration
pub(crate) fn debug<F>(config: &Config, message_func: F)
where
    F: FnOnce() -> String,
{
    if config.debug() {
        tracing::debug!("{}", message_func());
    }
}

/// Get a file for reading, this resolves relative files against the working directory first
pub(crate) fn get_filepath(filename: &str, workdir: Option<&Path>) -> Result<PathBuf, CasError> {
    if filename == "-" {
        //designates stdin or stdout
        return Ok(filename.into());
    }
    if filename.starts_with("https://") || filename.starts_with("http://") {
        return Err(CasError::OtherError("Loading URLs is not supported"));
    }
    let path = if let Some(stripped) = filename.strip_prefix("file://") {
        PathBuf::from(stripped)
    } else {
        PathBuf::from(filename)
    };
    if path.is_absolute() {
        Ok(path)
    } else {
        //check whether we can find one in our workdir first
        if let Some(workdir) = workdir {
            let path = workdir.join(&path);
            if path.is_file() {
                //should also work with symlinks
                return Ok(path);
            }
        }

        //final fallback is simply relative to the current working directly
        // we don't test for existance here
        Ok(path)
    }
}

/// Get a file for writing, relative files are placed in the working directory if one is set
pub(crate) fn get_output_filepath(filename: &str, workdir: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(filename);
    match workdir {
        Some(workdir) if path.is_relative() => workdir.join(path),
        _ => path,
    }
}

/// Auxiliary function to help open files
pub(crate) fn open_file(filename: &str, config: &Config) -> Result<File, CasError> {
    let found_filename = get_filepath(filename, config.workdir())?;
    debug(config, || format!("open_file: {:?}", found_filename));
    File::open(found_filename.as_path()).map_err(|e| {
        CasError::IOError(
            e,
            found_filename.as_path().to_string_lossy().into_owned(),
            "Opening file for reading failed",
        )
    })
}

/// Auxiliary function to help open files
pub(crate) fn create_file(filename: &str, config: &Config) -> Result<File, CasError> {
    let found_filename = get_output_filepath(filename, config.workdir());
    debug(config, || format!("create_file: {:?}", found_filename));
    File::create(found_filename.as_path()).map_err(|e| {
        CasError::IOError(
            e,
            found_filename.as_path().to_string_lossy().into_owned(),
            "Opening file for writing failed",
        )
    })
}

/// Auxiliary function to help open files
pub(crate) fn open_file_reader(
    filename: &str,
    config: &Config,
) -> Result<Box<dyn BufRead>, CasError> {
    if filename == "-" {
        //read from stdin
        Ok(Box::new(std::io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(open_file(filename, config)?)))
    }
}

/// Auxiliary function to help open files
pub(crate) fn open_file_writer(
    filename: &str,
    config: &Config,
) -> Result<Box<dyn Write>, CasError> {
    if filename == "-" {
        Ok(Box::new(std::io::stdout()))
    } else {
        Ok(Box::new(BufWriter::new(create_file(filename, config)?)))
    }
}

/// Reads an entire file (or stdin) into a string
pub(crate) fn read_to_string(filename: &str, config: &Config) -> Result<String, CasError> {
    let mut reader = open_file_reader(filename, config)?;
    let mut contents = String::new();
    reader
        .read_to_string(&mut contents)
        .map_err(|e| CasError::IOError(e, filename.to_string(), "Reading file failed"))?;
    Ok(contents)
}

/// Runs a writing function against a (buffered) file writer and flushes it afterwards
pub(crate) fn write_file<F>(filename: &str, config: &Config, write_func: F) -> Result<(), CasError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), CasError>,
{
    let mut writer = open_file_writer(filename, config)?;
    write_func(writer.as_mut())?;
    writer
        .flush()
        .map_err(|e| CasError::IOError(e, filename.to_string(), "Flushing output failed"))
}
