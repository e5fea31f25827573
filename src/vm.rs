use crate::channel::{Channel, Console, OpenFile};
use crate::config::{DebugMode, VmConfig};
use crate::data::{Data, Operation};
use crate::debug;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::pc::ProgramCounter;
use crate::stack::CellStack;
use crate::table::OpTable;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;
use std::path::Path;

// Pixel Virtual Machine //////////////////////////////////////////////////////
//
// Runs a program painted as an image. The program counter walks the image in
// raster order one instruction block at a time, the color under it is resolved
// to an operation with the table, and the operation is run against the stack.
//
// Strings live on the stack as a 0 sentinel followed by character codes. They
// are rebuilt by popping, so the character on top of the stack comes first.
//
// Loops have no jump table. A while-end scans back for its while-begin and a
// while-begin with a false top scans forward for its while-end, counting nested
// pairs on the way. Either scan leaves the cursor where the next instruction is
// so the run loop must not advance after one, like a jump op.
//
// The four I/O operations go to the opened file instead of the console while
// one is open. At most one file can be open.

// What the run loop should do after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Advance,
    Stay,
    End,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executed {
    pub op: Operation,
    pub flow: Flow,
    pub message: String,
}

impl Executed {
    fn advance(op: Operation, message: String) -> Executed {
        Executed {
            op,
            flow: Flow::Advance,
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    // Ran past the last instruction
    Finished,
    // Hit a quit instruction
    Quit,
}

#[derive(Debug)]
pub struct PixelVm<G: Grid, R: io::BufRead, W: io::Write> {
    pc: ProgramCounter,
    stack: CellStack,
    table: OpTable,
    grid: G,
    console: Console<R, W>,
    file: Option<OpenFile>,
    rng: StdRng,
    debug: DebugMode,
    steps: usize,
}

impl<G: Grid> PixelVm<G, io::StdinLock<'static>, io::Stdout> {
    pub fn new(
        grid: G,
        table: OpTable,
        config: &VmConfig,
    ) -> Result<PixelVm<G, io::StdinLock<'static>, io::Stdout>> {
        PixelVm::new_with_io(grid, table, config, io::stdin().lock(), io::stdout())
    }
}

impl<G: Grid, R: io::BufRead, W: io::Write> PixelVm<G, R, W> {
    pub fn new_with_io(
        grid: G,
        table: OpTable,
        config: &VmConfig,
        input: R,
        output: W,
    ) -> Result<PixelVm<G, R, W>> {
        let pc = ProgramCounter::new(grid.width(), grid.height(), config.instruction_size)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => unseeded_rng(),
        };
        Ok(PixelVm {
            pc,
            stack: CellStack::new(config.max_stack),
            table,
            grid,
            console: Console::new(input, output),
            file: None,
            rng,
            debug: config.debug,
            steps: 0,
        })
    }

    pub fn reset(&mut self) {
        self.pc.reset();
        self.stack.clear();
        self.file = None;
        self.steps = 0;
    }

    pub fn stack(&self) -> &CellStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut CellStack {
        &mut self.stack
    }

    pub fn position(&self) -> (usize, usize) {
        self.pc.position()
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn has_open_file(&self) -> bool {
        self.file.is_some()
    }

    pub fn output(&self) -> &W {
        &self.console.output
    }

    // Stack Helpers //////////////////////////////////////////////////////////

    fn pop(&mut self) -> Result<Data> {
        self.stack.pop()
    }

    // First popped is v1, it was pushed last
    fn pop2(&mut self) -> Result<(Data, Data)> {
        let v1 = self.stack.pop()?;
        let v2 = self.stack.pop()?;
        Ok((v1, v2))
    }

    fn push(&mut self, val: Data) -> Result<()> {
        self.stack.push(val)
    }

    // Pushes a sentinel and then the characters, all or nothing
    fn push_string(&mut self, text: &str) -> Result<()> {
        let needed = text.chars().count() + 1;
        if let Some(free) = self.stack.free() {
            if needed > free {
                return Err(Error::NoSpaceForString { needed, free });
            }
        }
        self.push(0)?;
        for ch in text.chars() {
            self.push(ch as Data)?;
        }
        Ok(())
    }

    // Pops down to and including the sentinel
    fn pop_string(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            let val = self.stack.pop().map_err(|_| Error::InvalidString)?;
            if val == 0 {
                return Ok(text);
            }
            let ch = u32::try_from(val)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            text.push(ch);
        }
    }

    fn channel(&mut self) -> &mut dyn Channel {
        match self.file.as_mut() {
            Some(file) => file,
            None => &mut self.console,
        }
    }

    // Where a write went, for debug messages
    fn sink_name(&self) -> String {
        match &self.file {
            Some(file) => format!("the opened file ({})", file.path().display()),
            None => "the console".to_string(),
        }
    }

    fn binary(
        &mut self,
        op: Operation,
        what: &str,
        f: impl Fn(Data, Data) -> Result<Data>,
    ) -> Result<Executed> {
        let (v1, v2) = self.pop2()?;
        let res = f(v1, v2)?;
        self.push(res)?;
        Ok(Executed::advance(
            op,
            format!(
                "Popped {}, popped {} and then pushed into the stack {} ({})",
                v1, v2, what, res
            ),
        ))
    }

    fn logic(
        &mut self,
        op: Operation,
        what: &str,
        f: impl Fn(bool, bool) -> bool,
    ) -> Result<Executed> {
        self.binary(op, what, |v1, v2| Ok(f(v1 != 0, v2 != 0) as Data))
    }

    // Program Execution //////////////////////////////////////////////////////

    fn current_op(&self) -> Operation {
        let (x, y) = self.pc.position();
        self.table.resolve(self.grid.color_at(x, y))
    }

    /// Runs from the current position until the program runs out, quits, or
    /// fails. Does not reset the stack first.
    pub fn run(&mut self) -> Result<Exit> {
        if self.grid.width() == 0 || self.grid.height() == 0 {
            return Ok(Exit::Finished);
        }
        log::info!(
            "running {}x{} program, instruction size {}",
            self.grid.width(),
            self.grid.height(),
            self.pc.instruction_size()
        );

        let exit = loop {
            if let Some(exit) = self.tick()? {
                break exit;
            }
        };

        self.console.flush()?;
        log::info!("program stopped ({:?}) after {} steps", exit, self.steps);
        Ok(exit)
    }

    /// Executes one instruction and moves on to the next. Returns the exit
    /// once the program has stopped.
    pub fn tick(&mut self) -> Result<Option<Exit>> {
        let done = self.step()?;
        log::trace!("{} -> {:?}", done.op.name(), done.flow);
        self.report(&done.message)?;
        let exit = match done.flow {
            Flow::Advance => self.pc.advance().err().map(|_| Exit::Finished),
            Flow::Stay => None,
            Flow::End => Some(Exit::Finished),
            Flow::Quit => Some(Exit::Quit),
        };
        Ok(exit)
    }

    /// Executes the instruction under the program counter. Only loop jumps
    /// move the counter, advancing is left to the caller.
    pub fn step(&mut self) -> Result<Executed> {
        if self.grid.width() == 0 || self.grid.height() == 0 {
            return Err(Error::OutOfBounds);
        }
        let op = self.current_op();
        log::trace!("executing at {:?}", self.pc.position());
        let done = self.execute(op)?;
        self.steps += 1;
        Ok(done)
    }

    pub fn execute(&mut self, op: Operation) -> Result<Executed> {
        match op {
            // I/O //
            Operation::InputInt => {
                let token = match self.channel().read_token()? {
                    Some(token) => token,
                    None => return Err(Error::Input("expected an integer".to_string())),
                };
                let val: Data = token
                    .parse()
                    .map_err(|_| Error::Input(format!("{:?} is not an integer", token)))?;
                self.push(val)?;
                Ok(Executed::advance(op, format!("Pushed {} into the stack", val)))
            }
            Operation::InputAscii => {
                let text = self.channel().read_string()?;
                self.push_string(&text)?;
                Ok(Executed::advance(
                    op,
                    format!("Pushed {} into the stack", debug::truncate(&text, 50)),
                ))
            }
            Operation::OutputInt => {
                let val = self.pop()?;
                self.channel().write_text(&val.to_string())?;
                Ok(Executed::advance(
                    op,
                    format!("Popped {} from the stack and wrote it to {}", val, self.sink_name()),
                ))
            }
            Operation::OutputAscii => {
                let text = self.pop_string()?;
                self.channel().write_text(&text)?;
                Ok(Executed::advance(
                    op,
                    format!(
                        "Popped {} from the stack and wrote it to {}",
                        debug::truncate(&text, 50),
                        self.sink_name()
                    ),
                ))
            }
            Operation::Output => {
                self.stack
                    .output(&mut self.console.output)
                    .map_err(Error::Output)?;
                Ok(Executed::advance(op, "Outputted all the stack content".to_string()))
            }

            // Arithmetic //
            Operation::Sum => self.binary(op, "their sum", |v1, v2| Ok(v1.wrapping_add(v2))),
            Operation::Sub => {
                self.binary(op, "their difference", |v1, v2| Ok(v2.wrapping_sub(v1)))
            }
            Operation::Mul => {
                self.binary(op, "their multiplication", |v1, v2| Ok(v1.wrapping_mul(v2)))
            }
            Operation::Div => self.binary(op, "the result of their division", |v1, v2| {
                if v1 == 0 {
                    return Err(Error::DivisionByZero);
                }
                Ok(v2.wrapping_div(v1))
            }),
            Operation::Mod => self.binary(op, "the result of their modulus", |v1, v2| {
                if v1 == 0 {
                    return Err(Error::DivisionByZero);
                }
                Ok(v2.wrapping_rem(v1))
            }),
            Operation::Rnd => {
                let n = self.pop()?;
                if n <= 0 {
                    return Err(Error::RandomRange(n));
                }
                let val = self.rng.random_range(0..n);
                self.push(val)?;
                Ok(Executed::advance(
                    op,
                    format!(
                        "Random generated {} [range 0 to {}] and then pushed it into the stack",
                        val,
                        n - 1
                    ),
                ))
            }

            // Logic //
            Operation::And => self.logic(op, "the result of their logical AND", |a, b| a && b),
            Operation::Or => self.logic(op, "the result of their logical OR", |a, b| a || b),
            Operation::Xor => self.logic(op, "the result of their logical XOR", |a, b| a != b),
            Operation::Nand => {
                self.logic(op, "the result of their logical NAND", |a, b| !(a && b))
            }
            Operation::Not => {
                let v1 = self.pop()?;
                let res = (v1 == 0) as Data;
                self.push(res)?;
                Ok(Executed::advance(
                    op,
                    format!(
                        "Popped {} from the stack and then pushed into the stack its logical NOT ({})",
                        v1, res
                    ),
                ))
            }

            // Bits //
            Operation::BitAnd => {
                self.binary(op, "the result of their bitwise AND", |v1, v2| Ok(v1 & v2))
            }
            Operation::BitOr => {
                self.binary(op, "the result of their bitwise OR", |v1, v2| Ok(v1 | v2))
            }
            Operation::BitXor => {
                self.binary(op, "the result of their bitwise XOR", |v1, v2| Ok(v1 ^ v2))
            }
            Operation::BitNot => {
                let v1 = self.pop()?;
                self.push(!v1)?;
                Ok(Executed::advance(
                    op,
                    format!(
                        "Popped {} from the stack and then pushed into the stack its bitwise NOT ({})",
                        v1, !v1
                    ),
                ))
            }
            Operation::LeftShift => {
                self.binary(op, "the result of their left bit shifting", |v1, v2| {
                    Ok(v2 << shift_amount(v1)?)
                })
            }
            Operation::RightShift => {
                self.binary(op, "the result of their right bit shifting", |v1, v2| {
                    Ok(v2 >> shift_amount(v1)?)
                })
            }

            // Stack //
            Operation::Pop => {
                let val = self.pop()?;
                Ok(Executed::advance(op, format!("Popped {} from the stack", val)))
            }
            Operation::Swap => {
                let (v1, v2) = self.pop2()?;
                self.push(v1)?;
                self.push(v2)?;
                Ok(Executed::advance(
                    op,
                    format!(
                        "Popped {}, popped {} and pushed in reverse order to swap them",
                        v1, v2
                    ),
                ))
            }
            Operation::Cycle => {
                self.stack.rotate_forward();
                Ok(Executed::advance(
                    op,
                    "Cycled clockwise by one step the stack".to_string(),
                ))
            }
            Operation::RCycle => {
                self.stack.rotate_backward();
                Ok(Executed::advance(
                    op,
                    "Cycled counter-clockwise by one step the stack".to_string(),
                ))
            }
            Operation::Dup => {
                let val = self.pop()?;
                self.push(val)?;
                self.push(val)?;
                Ok(Executed::advance(
                    op,
                    format!("Popped {} and then pushed it twice to duplicate it", val),
                ))
            }
            Operation::Reverse => {
                self.stack.reverse();
                Ok(Executed::advance(op, "Reversed stack content".to_string()))
            }

            // Control Flow //
            Operation::Quit => Ok(Executed {
                op,
                flow: Flow::Quit,
                message: "Quit the program".to_string(),
            }),
            Operation::While => {
                if self.stack.peek() != 0 {
                    return Ok(Executed::advance(op, "Entered in while loop".to_string()));
                }
                let flow = self.jump_forward()?;
                log::debug!("loop skipped to {:?}", self.pc.position());
                Ok(Executed {
                    op,
                    flow,
                    message: "Jumped forward for while loop".to_string(),
                })
            }
            Operation::WhileEnd => {
                self.jump_back()?;
                log::debug!("loop back to {:?}", self.pc.position());
                Ok(Executed {
                    op,
                    flow: Flow::Stay,
                    message: "Jumped back for while loop".to_string(),
                })
            }

            // Files //
            Operation::FileOpen => {
                if self.file.is_some() {
                    return Err(Error::FileAlreadyOpen);
                }
                let path = self.pop_string()?;
                let file = OpenFile::open(Path::new(&path))?;
                log::info!("opened file {:?}", file.path());
                self.file = Some(file);
                Ok(Executed::advance(op, format!("Opened file {}", path)))
            }
            Operation::FileClose => {
                let file = self.file.take().ok_or(Error::NoOpenFile)?;
                let path = file.path().display().to_string();
                file.close()?;
                log::info!("closed file {:?}", path);
                Ok(Executed::advance(op, format!("Closed file {}", path)))
            }

            // Fallback //
            Operation::Accumulate(color) => {
                let sum = color.channel_sum();
                self.push(sum)?;
                Ok(Executed::advance(op, format!("Pushed {} into the stack", sum)))
            }
        }
    }

    // Loop Scans /////////////////////////////////////////////////////////////

    // From a while-begin to just after its while-end. End when that while-end
    // is the last instruction of the image.
    fn jump_forward(&mut self) -> Result<Flow> {
        let mut depth: usize = 1;
        loop {
            self.pc.advance().map_err(|_| Error::MissingEndLoop)?;
            match self.current_op() {
                Operation::While => depth += 1,
                Operation::WhileEnd => {
                    depth -= 1;
                    if depth == 0 {
                        return match self.pc.advance() {
                            Ok(()) => Ok(Flow::Stay),
                            Err(_) => Ok(Flow::End),
                        };
                    }
                }
                _ => {}
            }
        }
    }

    // From a while-end back onto its while-begin so the condition is tested again
    fn jump_back(&mut self) -> Result<()> {
        let mut depth: usize = 1;
        loop {
            self.pc.retreat().map_err(|_| Error::MissingStartLoop)?;
            match self.current_op() {
                Operation::WhileEnd => depth += 1,
                Operation::While => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    // Debugging //////////////////////////////////////////////////////////////

    fn report(&mut self, message: &str) -> Result<()> {
        let pause = match self.debug {
            DebugMode::Off => return Ok(()),
            DebugMode::Trace => false,
            DebugMode::Step => true,
        };
        let text = debug::render(self.steps, message, &self.stack, pause);
        self.console.write_text(&text)?;
        if pause {
            self.console.flush()?;
            self.console.wait_line()?;
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn unseeded_rng() -> StdRng {
    StdRng::from_os_rng()
}

// No OS entropy on wasm32-unknown-unknown, web_interpret always passes a seed
#[cfg(target_arch = "wasm32")]
fn unseeded_rng() -> StdRng {
    StdRng::seed_from_u64(0)
}

fn shift_amount(v: Data) -> Result<Data> {
    if (0..Data::BITS as Data).contains(&v) {
        Ok(v)
    } else {
        Err(Error::InvalidShift(v))
    }
}

// Tests //////////////////////////////////////////////////////////////////////
