use crate::error::{Error, Result};

// Program Counter ////////////////////////////////////////////////////////////
//
// A cursor over the image in raster order. Every instruction is a square block
// of `size` pixels and the cursor always sits on the top left pixel of one.
// Running off either end of the image is reported as OutOfBounds and leaves
// the cursor where it was.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter {
    x: usize,
    y: usize,
    size: usize,
    width: usize,
    height: usize,
}

impl ProgramCounter {
    pub fn new(width: usize, height: usize, size: usize) -> Result<ProgramCounter> {
        if size == 0 {
            return Err(Error::InvalidInstructionSize);
        }
        Ok(ProgramCounter {
            x: 0,
            y: 0,
            size,
            width,
            height,
        })
    }

    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn instruction_size(&self) -> usize {
        self.size
    }

    pub fn set_position(&mut self, x: usize, y: usize) {
        self.x = x;
        self.y = y;
    }

    pub fn reset(&mut self) {
        self.x = 0;
        self.y = 0;
    }

    pub fn advance(&mut self) -> Result<()> {
        if self.x + self.size < self.width {
            self.x += self.size;
            return Ok(());
        }
        if self.y + self.size < self.height {
            self.y += self.size;
            self.x = 0;
            return Ok(());
        }
        Err(Error::OutOfBounds)
    }

    pub fn retreat(&mut self) -> Result<()> {
        if let Some(x) = self.x.checked_sub(self.size) {
            self.x = x;
            return Ok(());
        }
        if let Some(y) = self.y.checked_sub(self.size) {
            self.y = y;
            self.x = self.last_column();
            return Ok(());
        }
        Err(Error::OutOfBounds)
    }

    // The last column advance can land on, width - size when the width is a
    // multiple of the size
    fn last_column(&self) -> usize {
        (self.width.saturating_sub(1) / self.size) * self.size
    }
}
