// Data types and operations
use std::fmt;

// Type aliases for readability ///////////////////////////////////////////////
pub type Data = i32;

// Colors /////////////////////////////////////////////////////////////////////

// A pixel with the alpha channel already dropped. Colors are only ever compared
// exactly, there is no nearest color matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    // The value an unrecognized color pushes
    pub fn channel_sum(&self) -> Data {
        self.r as Data + self.g as Data + self.b as Data
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// Operations /////////////////////////////////////////////////////////////////

// Every color in a program resolves to one of these. Accumulate is the fallback
// for colors that are not in the table and is never given a color of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // I/O
    InputInt,
    OutputInt,
    InputAscii,
    OutputAscii,
    Output,
    // Arithmetic
    Sum,
    Sub,
    Div,
    Mul,
    Mod,
    Rnd,
    // Logic
    And,
    Or,
    Xor,
    Nand,
    Not,
    // Bits
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    LeftShift,
    RightShift,
    // Stack
    Pop,
    Swap,
    Cycle,
    RCycle,
    Dup,
    Reverse,
    // Control Flow
    Quit,
    While,
    WhileEnd,
    // Files
    FileOpen,
    FileClose,
    // Fallback
    Accumulate(Color),
}

impl Operation {
    // All operations that own a color, in table order
    pub const COLORED: [Operation; 33] = [
        Operation::InputInt,
        Operation::OutputInt,
        Operation::Sum,
        Operation::Sub,
        Operation::Div,
        Operation::Mul,
        Operation::Mod,
        Operation::Rnd,
        Operation::And,
        Operation::Or,
        Operation::Xor,
        Operation::Nand,
        Operation::Not,
        Operation::BitAnd,
        Operation::BitOr,
        Operation::BitXor,
        Operation::BitNot,
        Operation::LeftShift,
        Operation::RightShift,
        Operation::InputAscii,
        Operation::OutputAscii,
        Operation::Pop,
        Operation::Swap,
        Operation::Cycle,
        Operation::RCycle,
        Operation::Dup,
        Operation::Reverse,
        Operation::Quit,
        Operation::Output,
        Operation::While,
        Operation::WhileEnd,
        Operation::FileOpen,
        Operation::FileClose,
    ];

    /// The name used for the operation in color configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::InputInt => "INPUT_INT",
            Operation::OutputInt => "OUTPUT_INT",
            Operation::Sum => "SUM",
            Operation::Sub => "SUB",
            Operation::Div => "DIV",
            Operation::Mul => "MUL",
            Operation::Mod => "MOD",
            Operation::Rnd => "RND",
            Operation::And => "AND",
            Operation::Or => "OR",
            Operation::Xor => "XOR",
            Operation::Nand => "NAND",
            Operation::Not => "NOT",
            Operation::BitAnd => "BAND",
            Operation::BitOr => "BOR",
            Operation::BitXor => "BXOR",
            Operation::BitNot => "BNOT",
            Operation::LeftShift => "LSHIFT",
            Operation::RightShift => "RSHIFT",
            Operation::InputAscii => "INPUT_ASCII",
            Operation::OutputAscii => "OUTPUT_ASCII",
            Operation::Pop => "POP",
            Operation::Swap => "SWAP",
            Operation::Cycle => "CYCLE",
            Operation::RCycle => "RCYCLE",
            Operation::Dup => "DUP",
            Operation::Reverse => "REVERSE",
            Operation::Quit => "QUIT",
            Operation::Output => "OUTPUT",
            Operation::While => "WHILE",
            Operation::WhileEnd => "WHILE_END",
            Operation::FileOpen => "FILE_OPEN",
            Operation::FileClose => "FILE_CLOSE",
            Operation::Accumulate(_) => "ACCUMULATE",
        }
    }

    pub fn from_name(name: &str) -> Option<Operation> {
        Operation::COLORED
            .iter()
            .copied()
            .find(|op| op.name() == name)
    }

    /// The color an operation has before any configuration is applied.
    /// Accumulate has no color and returns `None`.
    pub fn default_color(&self) -> Option<Color> {
        let color = match self {
            Operation::InputInt => Color::new(255, 255, 255),
            Operation::OutputInt => Color::new(0, 0, 1),
            Operation::Sum => Color::new(0, 206, 209),
            Operation::Sub => Color::new(255, 165, 0),
            Operation::Div => Color::new(138, 43, 226),
            Operation::Mul => Color::new(139, 0, 0),
            Operation::Mod => Color::new(255, 218, 185),
            Operation::Rnd => Color::new(0, 128, 0),
            Operation::And => Color::new(236, 243, 220),
            Operation::Or => Color::new(183, 198, 230),
            Operation::Xor => Color::new(245, 227, 215),
            Operation::Nand => Color::new(225, 211, 239),
            Operation::Not => Color::new(255, 154, 162),
            Operation::BitAnd => Color::new(138, 163, 153),
            Operation::BitOr => Color::new(125, 132, 178),
            Operation::BitXor => Color::new(143, 166, 203),
            Operation::BitNot => Color::new(219, 244, 167),
            Operation::LeftShift => Color::new(45, 106, 125),
            Operation::RightShift => Color::new(67, 157, 186),
            Operation::InputAscii => Color::new(227, 227, 227),
            Operation::OutputAscii => Color::new(75, 75, 75),
            Operation::Pop => Color::new(204, 158, 6),
            Operation::Swap => Color::new(255, 189, 74),
            Operation::Cycle => Color::new(227, 127, 157),
            Operation::RCycle => Color::new(233, 148, 174),
            Operation::Dup => Color::new(0, 105, 148),
            Operation::Reverse => Color::new(165, 165, 141),
            Operation::Quit => Color::new(183, 228, 199),
            Operation::Output => Color::new(155, 34, 66),
            Operation::While => Color::new(46, 26, 71),
            Operation::WhileEnd => Color::new(104, 71, 141),
            Operation::FileOpen => Color::new(145, 246, 139),
            Operation::FileClose => Color::new(47, 237, 35),
            Operation::Accumulate(_) => return None,
        };
        Some(color)
    }
}

// Hex colors /////////////////////////////////////////////////////////////////

// Parses "rrggbb" or "rgb" (each nibble doubled), with an optional leading '#'.
pub fn parse_hex(s: &str) -> Option<Color> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |from: usize, len: usize| u8::from_str_radix(&digits[from..from + len], 16).ok();
    match digits.len() {
        6 => Some(Color::new(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
        3 => Some(Color::new(
            channel(0, 1)? * 17,
            channel(1, 1)? * 17,
            channel(2, 1)? * 17,
        )),
        _ => None,
    }
}
