pub mod channel;
pub mod config;
pub mod data;
pub mod debug;
pub mod error;
pub mod grid;
pub mod pc;
pub mod stack;
pub mod table;
pub mod vm;
use wasm_bindgen::prelude::*;

pub use config::{ColorConfig, DebugMode, VmConfig};
pub use data::{Color, Data, Operation};
pub use error::{Error, Result};
pub use grid::{Grid, RasterGrid};
pub use table::OpTable;
pub use vm::{Exit, PixelVm};

// Runs a program handed over as packed RGB bytes with in memory I/O, so a page
// can paint a program and show what it prints. Errors come back as text.
#[wasm_bindgen]
pub fn web_interpret(rgb: &[u8], width: u32, height: u32, input: &str, seed: u64) -> String {
    let config = VmConfig {
        seed: Some(seed),
        ..VmConfig::default()
    };
    let mut out: Vec<u8> = Vec::new();
    let res = RasterGrid::from_rgb(width as usize, height as usize, rgb)
        .and_then(|grid| {
            PixelVm::new_with_io(grid, OpTable::new(), &config, input.as_bytes(), &mut out)
        })
        .and_then(|mut vm| vm.run());
    match res {
        Ok(_) => String::from_utf8_lossy(&out).into_owned(),
        Err(e) => format!("{}error: {}", String::from_utf8_lossy(&out), e),
    }
}

#[cfg(test)]
mod web_tests {
    use super::*;

    fn rgb(ops: &[Operation]) -> Vec<u8> {
        let grid = RasterGrid::from_ops(ops);
        (0..grid.width())
            .flat_map(|x| {
                let c = grid.color_at(x, 0);
                [c.r, c.g, c.b]
            })
            .collect()
    }

    #[test]
    fn test_web_interpret_echo() {
        let bytes = rgb(&[Operation::InputInt, Operation::Dup, Operation::Sum, Operation::OutputInt]);
        assert_eq!(web_interpret(&bytes, 4, 1, "21", 0), "42");
    }

    #[test]
    fn test_web_interpret_error() {
        let bytes = rgb(&[Operation::Pop]);
        assert_eq!(web_interpret(&bytes, 1, 1, "", 0), "error: trying to pop an empty stack");
    }

    #[test]
    fn test_web_interpret_seeded_rnd() {
        let bytes = rgb(&[
            Operation::Accumulate(Color::new(100, 0, 0)),
            Operation::Rnd,
            Operation::OutputInt,
        ]);
        let first = web_interpret(&bytes, 3, 1, "", 11);
        assert!(!first.starts_with("error"));
        assert_eq!(web_interpret(&bytes, 3, 1, "", 11), first);
    }

    #[test]
    fn test_web_interpret_short_buffer() {
        let bytes = rgb(&[Operation::Sum]);
        let res = web_interpret(&bytes, 3, 1, "", 0);
        assert!(res.starts_with("error: pixel buffer of 3 bytes"));
    }

    #[test]
    fn test_web_interpret_huge_dimensions() {
        let res = web_interpret(&[], u32::MAX, u32::MAX, "", 0);
        assert!(res.starts_with("error: pixel buffer of 0 bytes"));
    }
}
