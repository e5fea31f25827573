use crate::error::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

// Channel Trait //////////////////////////////////////////////////////////////
//
// The I/O operations talk to the console and to an opened file the same way.
// `read_string` is a single token on the console but everything left on a file.

pub trait Channel {
    fn read_token(&mut self) -> Result<Option<String>>;
    fn read_string(&mut self) -> Result<String>;
    fn write_text(&mut self, text: &str) -> Result<()>;
}

// Reads one whitespace delimited token. None at end of input.
pub fn read_token<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut token: Vec<u8> = Vec::new();
    loop {
        let buf = input.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        let mut used = 0;
        let mut done = false;
        for b in buf.iter() {
            used += 1;
            if b.is_ascii_whitespace() {
                if !token.is_empty() {
                    done = true;
                    break;
                }
            } else {
                token.push(*b);
            }
        }
        input.consume(used);
        if done {
            break;
        }
    }
    if token.is_empty() {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&token).into_owned()))
}

// Console ////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub struct Console<R: BufRead, W: Write> {
    pub input: R,
    pub output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Console<R, W> {
        Console { input, output }
    }

    // Blocks until a full line is read, used by the interactive debugger
    pub fn wait_line(&mut self) -> Result<()> {
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .map_err(|e| Error::Input(e.to_string()))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.output.flush().map_err(Error::Output)
    }
}

impl<R: BufRead, W: Write> Channel for Console<R, W> {
    fn read_token(&mut self) -> Result<Option<String>> {
        read_token(&mut self.input).map_err(|e| Error::Input(e.to_string()))
    }

    fn read_string(&mut self) -> Result<String> {
        match self.read_token()? {
            Some(token) => Ok(token),
            None => Err(Error::Input("unexpected end of input".to_string())),
        }
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).map_err(Error::Output)
    }
}

// Opened File ////////////////////////////////////////////////////////////////
//
// Created if missing and opened for reading and appending. Reads start at the
// beginning of the file while writes always land at its end.

#[derive(Debug)]
pub struct OpenFile {
    path: PathBuf,
    reader: BufReader<File>,
}

impl OpenFile {
    pub fn open(path: &Path) -> Result<OpenFile> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)
            .map_err(|source| Error::OpenFile {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(OpenFile {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn close(self) -> Result<()> {
        let file = self.reader.into_inner();
        file.sync_all().map_err(Error::CloseFile)
    }
}

impl Channel for OpenFile {
    fn read_token(&mut self) -> Result<Option<String>> {
        read_token(&mut self.reader).map_err(Error::ReadFile)
    }

    fn read_string(&mut self) -> Result<String> {
        let mut content = String::new();
        self.reader
            .read_to_string(&mut content)
            .map_err(Error::ReadFile)?;
        Ok(content)
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        let file = self.reader.get_mut();
        file.write_all(text.as_bytes()).map_err(Error::WriteFile)?;
        file.flush().map_err(Error::WriteFile)
    }
}
