//! Parsing for PostScript Type2 charstrings.
//!
//! Evaluation happens in two passes. [`Charstring::parse`] runs the stack
//! machine, expanding subroutine calls and arithmetic, and records the
//! resulting path construction and hint operators along with the advance
//! width. [`Charstring::draw`] then replays the recorded operators against a
//! running current point, emitting absolute commands to a [`CommandSink`].

use types::{BoundingBox, Fixed, Point};

use super::{Error, Index, Number, Stack};
use crate::{Cursor, FontData};

/// Maximum nesting depth for subroutine calls.
///
/// See "Appendix B Type 2 Charstring Implementation Limits" at
/// <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=33>
pub const NESTING_DEPTH_LIMIT: u32 = 10;

/// Number of elements in the transient array used by `put` and `get`.
pub const TRANSIENT_ARRAY_SIZE: usize = 32;

/// Trait for processing commands resulting from charstring evaluation.
///
/// During processing, the path construction operators (see "4.1 Path
/// Construction Operators" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=15>)
/// are simplified into the basic move, line, curve and close commands.
///
/// This also has optional callbacks for processing hint operators.
#[allow(unused_variables)]
pub trait CommandSink {
    // Path construction operators.
    fn move_to(&mut self, x: Fixed, y: Fixed);
    fn line_to(&mut self, x: Fixed, y: Fixed);
    fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed);
    fn close(&mut self);
    // Hint operators.
    /// Horizontal stem hint with edges at `y0` and `y1`.
    fn hstem(&mut self, y0: Fixed, y1: Fixed) {}
    /// Vertical stem hint with edges at `x0` and `x1`.
    fn vstem(&mut self, x0: Fixed, x1: Fixed) {}
    /// Bitmask defining the hints that should be made active for the
    /// commands that follow.
    fn hint_mask(&mut self, mask: &[u8]) {}
    /// Bitmask defining the counter hints that should be made active for the
    /// commands that follow.
    fn counter_mask(&mut self, mask: &[u8]) {}
}

/// Command sink that accumulates the bounding box of all points, including
/// curve control points.
#[derive(Clone, Default, Debug)]
pub struct BoundsSink {
    bounds: Option<BoundingBox<Fixed>>,
}

impl BoundsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the accumulated bounds, or `None` if no points were seen.
    pub fn bounds(&self) -> Option<BoundingBox<Fixed>> {
        self.bounds
    }

    fn add(&mut self, x: Fixed, y: Fixed) {
        let point = Point::new(x, y);
        match self.bounds.as_mut() {
            Some(bounds) => bounds.add_point(point),
            None => self.bounds = Some(BoundingBox::from_point(point)),
        }
    }
}

impl CommandSink for BoundsSink {
    fn move_to(&mut self, x: Fixed, y: Fixed) {
        self.add(x, y);
    }

    fn line_to(&mut self, x: Fixed, y: Fixed) {
        self.add(x, y);
    }

    fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed) {
        self.add(cx0, cy0);
        self.add(cx1, cy1);
        self.add(x, y);
    }

    fn close(&mut self) {}
}

/// A path construction or hint operator recorded during evaluation, with
/// its operands.
///
/// The glyph width, if present, has already been removed from the operands.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Operation {
    pub operator: Operator,
    pub operands: Vec<Fixed>,
    /// The mask bytes for `hintmask` and `cntrmask`; empty otherwise.
    pub mask: Vec<u8>,
}

impl Operation {
    fn new(operator: Operator, operands: Vec<Fixed>) -> Self {
        Self {
            operator,
            operands,
            mask: Vec::new(),
        }
    }
}

/// The result of evaluating a charstring: a flat list of operators and the
/// advance width, if one was encoded.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct Charstring {
    operations: Vec<Operation>,
    width: Option<Fixed>,
}

impl Charstring {
    /// Evaluates the given charstring, expanding subroutine calls.
    ///
    /// If the Private DICT associated with this charstring contains local
    /// subroutines, then the `subrs` index must be provided, otherwise
    /// `Error::MissingSubroutines` will be returned if a callsubr operator
    /// is present.
    pub fn parse(
        charstring_data: &[u8],
        global_subrs: Index,
        subrs: Option<Index>,
    ) -> Result<Self, Error> {
        let mut parser = Parser::new(global_subrs, subrs);
        parser.parse(charstring_data, 0)?;
        Ok(Self {
            operations: parser.operations,
            width: parser.width,
        })
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The width operand, relative to the nominal width of the associated
    /// Private DICT.
    pub fn width(&self) -> Option<Fixed> {
        self.width
    }

    /// Replays the recorded operators, sending absolute commands to `sink`.
    ///
    /// Every moveto starts a new subpath and closes the previous one.
    pub fn draw(&self, sink: &mut impl CommandSink) -> Result<(), Error> {
        let mut replay = Replay {
            sink,
            is_open: false,
            x: Fixed::ZERO,
            y: Fixed::ZERO,
        };
        for operation in &self.operations {
            replay.operation(operation)?;
        }
        if replay.is_open {
            replay.sink.close();
        }
        Ok(())
    }

    /// Returns the bounding box of the outline, including control points.
    pub fn bounds(&self) -> Result<Option<BoundingBox<Fixed>>, Error> {
        let mut sink = BoundsSink::new();
        self.draw(&mut sink)?;
        Ok(sink.bounds())
    }
}

/// Evaluates the given charstring and emits the resulting commands to the
/// specified sink.
///
/// Returns the width operand, if present.
pub fn evaluate(
    charstring_data: &[u8],
    global_subrs: Index,
    subrs: Option<Index>,
    sink: &mut impl CommandSink,
) -> Result<Option<Fixed>, Error> {
    let charstring = Charstring::parse(charstring_data, global_subrs, subrs)?;
    charstring.draw(sink)?;
    Ok(charstring.width())
}

/// Transient state for evaluating a charstring and handling recursive
/// subroutine calls.
struct Parser<'a> {
    global_subrs: Index<'a>,
    subrs: Option<Index<'a>>,
    // shared across subroutine calls; reset only per charstring
    have_read_width: bool,
    width: Option<Fixed>,
    stem_count: usize,
    stack: Stack,
    transient: [Number; TRANSIENT_ARRAY_SIZE],
    operations: Vec<Operation>,
}

impl<'a> Parser<'a> {
    fn new(global_subrs: Index<'a>, subrs: Option<Index<'a>>) -> Self {
        Self {
            global_subrs,
            subrs,
            have_read_width: false,
            width: None,
            stem_count: 0,
            stack: Stack::new(),
            transient: [Number::ZERO; TRANSIENT_ARRAY_SIZE],
            operations: Vec::new(),
        }
    }

    /// Evaluates a charstring or subroutine.
    ///
    /// Returns `Ok(false)` once `endchar` has been seen.
    fn parse(&mut self, charstring_data: &[u8], nesting_depth: u32) -> Result<bool, Error> {
        if nesting_depth > NESTING_DEPTH_LIMIT {
            return Err(Error::CharstringNestingDepthLimitExceeded);
        }
        let mut cursor = FontData::new(charstring_data).cursor();
        while cursor.remaining_bytes() != 0 {
            let b0 = cursor.read::<u8>()?;
            match b0 {
                // See "3.2 Charstring Number Encoding" <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=12>
                //
                // Push an integer to the stack
                28 | 32..=254 => {
                    self.stack.push(super::dict::parse_int(&mut cursor, b0)?)?;
                }
                // Push a fixed point value to the stack
                255 => {
                    let num = Fixed::from_bits(cursor.read::<i32>()?);
                    self.stack.push(num)?;
                }
                _ => {
                    let operator = Operator::read(&mut cursor, b0)?;
                    match self.parse_operator(operator, &mut cursor, nesting_depth)? {
                        Flow::Continue => {}
                        Flow::Return => return Ok(true),
                        Flow::EndChar => return Ok(false),
                    }
                }
            }
        }
        Ok(true)
    }

    /// Consumes the width from the bottom of the stack if `has_width` is
    /// true and this is the first stack clearing operator of the glyph.
    ///
    /// Only the first such operator may carry a width, so later calls never
    /// consume an operand even when the first one had no width.
    ///
    /// Returns the index of the first remaining operand.
    fn read_width(&mut self, has_width: bool) -> Result<usize, Error> {
        if std::mem::replace(&mut self.have_read_width, true) || !has_width {
            return Ok(0);
        }
        self.width = Some(self.stack.get_fixed(0)?);
        Ok(1)
    }

    fn operands_from(&self, start: usize) -> Vec<Fixed> {
        self.stack.fixed_values().skip(start).collect()
    }

    /// Records the current stack as a sequence of stem hints.
    fn stems(&mut self, operator: Operator) -> Result<(), Error> {
        let start = self.read_width(self.stack.len_is_odd())?;
        let operands = self.operands_from(start);
        self.stem_count += operands.len() / 2;
        self.operations.push(Operation::new(operator, operands));
        self.stack.clear();
        Ok(())
    }

    fn parse_operator(
        &mut self,
        operator: Operator,
        cursor: &mut Cursor,
        nesting_depth: u32,
    ) -> Result<Flow, Error> {
        use Operator::*;
        match operator {
            HStem | VStem | HStemHm | VStemHm => self.stems(operator)?,
            // Arguments before a mask are an implied vstemhm.
            // Spec: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=24>
            HintMask | CntrMask => {
                if self.stack.is_empty() {
                    self.read_width(false)?;
                } else {
                    self.stems(VStemHm)?;
                }
                let count = self.stem_count.div_ceil(8);
                let mask = cursor.read_bytes(count)?;
                self.operations.push(Operation {
                    operator,
                    operands: Vec::new(),
                    mask: mask.to_vec(),
                });
            }
            RMoveTo => self.path(operator, 2)?,
            HMoveTo | VMoveTo => self.path(operator, 1)?,
            RLineTo | HLineTo | VLineTo | RrCurveTo | HhCurveTo | HvCurveTo | VhCurveTo
            | VvCurveTo | RCurveLine | RLineCurve | HFlex | Flex | HFlex1 | Flex1 => {
                let operands = self.operands_from(0);
                self.operations.push(Operation::new(operator, operands));
                self.stack.clear();
            }
            // End the current charstring
            // Spec: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=21>
            EndChar => {
                self.read_width(self.stack.len_is_odd())?;
                self.operations.push(Operation::new(EndChar, Vec::new()));
                self.stack.clear();
                return Ok(Flow::EndChar);
            }
            // Deprecated and ignored
            DotSection => self.stack.clear(),
            // Return from the current subroutine
            Return => return Ok(Flow::Return),
            // Call local or global subroutine
            // Spec: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=29>
            CallSubr | CallGsubr => {
                let subrs_index = if operator == CallSubr {
                    self.subrs.ok_or(Error::MissingSubroutines)?
                } else {
                    self.global_subrs
                };
                let biased_index = self.stack.pop_i32()?.saturating_add(subrs_index.subr_bias());
                let subr_charstring_data = usize::try_from(biased_index)
                    .ok()
                    .filter(|ix| *ix < subrs_index.count() as usize)
                    .ok_or(Error::InvalidSubroutineIndex(biased_index))
                    .and_then(|ix| subrs_index.get(ix))?;
                if !self.parse(subr_charstring_data, nesting_depth + 1)? {
                    return Ok(Flow::EndChar);
                }
            }
            // Arithmetic, logical and storage operators
            // Spec: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=25>
            Abs => {
                let a = self.stack.pop_fixed()?;
                self.stack.push(a.abs())?;
            }
            Add => {
                let b = self.stack.pop_fixed()?;
                let a = self.stack.pop_fixed()?;
                self.stack.push(a + b)?;
            }
            Sub => {
                let b = self.stack.pop_fixed()?;
                let a = self.stack.pop_fixed()?;
                self.stack.push(a - b)?;
            }
            Div => {
                let b = self.stack.pop_fixed()?;
                let a = self.stack.pop_fixed()?;
                self.stack.push(a / b)?;
            }
            Mul => {
                let b = self.stack.pop_fixed()?;
                let a = self.stack.pop_fixed()?;
                self.stack.push(a * b)?;
            }
            Neg => {
                let a = self.stack.pop_fixed()?;
                self.stack.push(-a)?;
            }
            Sqrt => {
                let a = self.stack.pop_fixed()?;
                self.stack
                    .push(Fixed::from_f64(a.to_f64().max(0.0).sqrt()))?;
            }
            Eq => {
                let b = self.stack.pop_fixed()?;
                let a = self.stack.pop_fixed()?;
                self.stack.push((a == b) as i32)?;
            }
            And => {
                let b = self.stack.pop_fixed()?;
                let a = self.stack.pop_fixed()?;
                self.stack
                    .push((a != Fixed::ZERO && b != Fixed::ZERO) as i32)?;
            }
            Or => {
                let b = self.stack.pop_fixed()?;
                let a = self.stack.pop_fixed()?;
                self.stack
                    .push((a != Fixed::ZERO || b != Fixed::ZERO) as i32)?;
            }
            Not => {
                let a = self.stack.pop_fixed()?;
                self.stack.push((a == Fixed::ZERO) as i32)?;
            }
            IfElse => {
                let v2 = self.stack.pop_fixed()?;
                let v1 = self.stack.pop_fixed()?;
                let s2 = self.stack.pop()?;
                let s1 = self.stack.pop()?;
                self.stack.push(if v1 <= v2 { s1 } else { s2 })?;
            }
            Drop => {
                self.stack.pop()?;
            }
            Dup => self.stack.dup()?,
            Exch => self.stack.exch()?,
            Index => {
                // negative indices copy the top element
                let depth = self.stack.pop_i32()?.max(0) as usize;
                self.stack.index(depth)?;
            }
            Roll => {
                let j = self.stack.pop_i32()?;
                let n = self.stack.pop_i32()?;
                let n = usize::try_from(n).map_err(|_| Error::StackUnderflow)?;
                self.stack.roll(n, j)?;
            }
            Put => {
                let i = self.stack.pop_i32()?;
                let value = self.stack.pop()?;
                *self.transient_slot(i)? = value;
            }
            Get => {
                let i = self.stack.pop_i32()?;
                let value = *self.transient_slot(i)?;
                self.stack.push(value)?;
            }
            Random => return Err(Error::UnsupportedCharstringOperator("random")),
        }
        Ok(Flow::Continue)
    }

    /// Records a moveto, consuming the width if more than `arity` operands
    /// are present.
    fn path(&mut self, operator: Operator, arity: usize) -> Result<(), Error> {
        let start = self.read_width(self.stack.len() > arity)?;
        let operands = self.operands_from(start);
        self.operations.push(Operation::new(operator, operands));
        self.stack.clear();
        Ok(())
    }

    fn transient_slot(&mut self, index: i32) -> Result<&mut Number, Error> {
        usize::try_from(index)
            .ok()
            .and_then(|ix| self.transient.get_mut(ix))
            .ok_or(Error::InvalidStackAccess(index.max(0) as usize))
    }
}

enum Flow {
    Continue,
    Return,
    EndChar,
}

/// Replays recorded operators against the current point.
struct Replay<'s, S> {
    sink: &'s mut S,
    is_open: bool,
    x: Fixed,
    y: Fixed,
}

fn args<const N: usize>(operands: &[Fixed], start: usize) -> Result<[Fixed; N], Error> {
    let end = start + N;
    operands
        .get(start..end)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(Error::InvalidStackAccess(end - 1))
}

fn arg(operands: &[Fixed], index: usize) -> Result<Fixed, Error> {
    operands
        .get(index)
        .copied()
        .ok_or(Error::InvalidStackAccess(index))
}

impl<S> Replay<'_, S>
where
    S: CommandSink,
{
    fn curve(&mut self, x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed, x3: Fixed, y3: Fixed) {
        self.sink.curve_to(x1, y1, x2, y2, x3, y3);
        self.x = x3;
        self.y = y3;
    }

    fn line(&mut self, dx: Fixed, dy: Fixed) {
        self.x += dx;
        self.y += dy;
        self.sink.line_to(self.x, self.y);
    }

    fn operation(&mut self, operation: &Operation) -> Result<(), Error> {
        use Operator::*;
        let operands = operation.operands.as_slice();
        let count = operands.len();
        match operation.operator {
            HStem | VStem | HStemHm | VStemHm => {
                let is_horizontal = matches!(operation.operator, HStem | HStemHm);
                let mut u = Fixed::ZERO;
                let mut i = 0;
                while i < count {
                    let [du, w] = args::<2>(operands, i)?;
                    u += du;
                    let v = u + w;
                    if is_horizontal {
                        self.sink.hstem(u, v);
                    } else {
                        self.sink.vstem(u, v);
                    }
                    u = v;
                    i += 2;
                }
            }
            HintMask => self.sink.hint_mask(&operation.mask),
            CntrMask => self.sink.counter_mask(&operation.mask),
            // Starts a new subpath
            // Spec: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=16>
            RMoveTo | HMoveTo | VMoveTo => {
                if self.is_open {
                    self.sink.close();
                }
                self.is_open = true;
                match operation.operator {
                    RMoveTo => {
                        let [dx, dy] = args::<2>(operands, 0)?;
                        self.x += dx;
                        self.y += dy;
                    }
                    HMoveTo => self.x += arg(operands, 0)?,
                    _ => self.y += arg(operands, 0)?,
                }
                self.sink.move_to(self.x, self.y);
            }
            // Emits a sequence of lines
            RLineTo => {
                let mut i = 0;
                while i < count {
                    let [dx, dy] = args::<2>(operands, i)?;
                    self.line(dx, dy);
                    i += 2;
                }
            }
            // Emits a sequence of alternating horizontal and vertical
            // lines
            HLineTo | VLineTo => {
                let mut is_x = operation.operator == HLineTo;
                for value in operands {
                    if is_x {
                        self.line(*value, Fixed::ZERO);
                    } else {
                        self.line(Fixed::ZERO, *value);
                    }
                    is_x = !is_x;
                }
            }
            // Emits a sequence of curves possibly followed by a line
            RrCurveTo | RCurveLine => {
                let mut i = 0;
                while i + 6 <= count {
                    let a = args::<6>(operands, i)?;
                    let x1 = self.x + a[0];
                    let y1 = self.y + a[1];
                    let x2 = x1 + a[2];
                    let y2 = y1 + a[3];
                    self.curve(x1, y1, x2, y2, x2 + a[4], y2 + a[5]);
                    i += 6;
                }
                if operation.operator == RCurveLine {
                    let [dx, dy] = args::<2>(operands, i)?;
                    self.line(dx, dy);
                } else if i != count {
                    return Err(Error::InvalidStackAccess(count));
                }
            }
            // Emits a sequence of lines followed by a curve
            RLineCurve => {
                let mut i = 0;
                while i + 6 < count {
                    let [dx, dy] = args::<2>(operands, i)?;
                    self.line(dx, dy);
                    i += 2;
                }
                let a = args::<6>(operands, i)?;
                let x1 = self.x + a[0];
                let y1 = self.y + a[1];
                let x2 = x1 + a[2];
                let y2 = y1 + a[3];
                self.curve(x1, y1, x2, y2, x2 + a[4], y2 + a[5]);
            }
            // Emits curves that start and end horizontal, unless
            // the operand count is odd, in which case the first
            // curve may start with a vertical tangent
            HhCurveTo => {
                let mut i = 0;
                let mut dy1 = Fixed::ZERO;
                if count % 2 == 1 {
                    dy1 = arg(operands, 0)?;
                    i = 1;
                }
                while i < count {
                    let a = args::<4>(operands, i)?;
                    let x1 = self.x + a[0];
                    let y1 = self.y + dy1;
                    let x2 = x1 + a[1];
                    let y2 = y1 + a[2];
                    self.curve(x1, y1, x2, y2, x2 + a[3], y2);
                    dy1 = Fixed::ZERO;
                    i += 4;
                }
            }
            // Emits curves that start and end vertical, unless
            // the operand count is odd, in which case the first
            // curve may start with a horizontal tangent
            VvCurveTo => {
                let mut i = 0;
                let mut dx1 = Fixed::ZERO;
                if count % 2 == 1 {
                    dx1 = arg(operands, 0)?;
                    i = 1;
                }
                while i < count {
                    let a = args::<4>(operands, i)?;
                    let x1 = self.x + dx1;
                    let y1 = self.y + a[0];
                    let x2 = x1 + a[1];
                    let y2 = y1 + a[2];
                    self.curve(x1, y1, x2, y2, x2, y2 + a[3]);
                    dx1 = Fixed::ZERO;
                    i += 4;
                }
            }
            // Alternates between curves with horizontal and vertical
            // tangents. A fifth operand on the final curve supplies the
            // delta for the otherwise fixed axis of its end point.
            // Spec: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=17>
            HvCurveTo | VhCurveTo => {
                let mut i = 0;
                let mut horizontal = operation.operator == HvCurveTo;
                // 4n operands, or 4n + 1 with the final delta
                if count < 4 || count % 4 > 1 {
                    return Err(Error::InvalidStackAccess(count));
                }
                while i + 4 <= count {
                    let a = args::<4>(operands, i)?;
                    let last = if count - i == 5 {
                        arg(operands, i + 4)?
                    } else {
                        Fixed::ZERO
                    };
                    if horizontal {
                        let x1 = self.x + a[0];
                        let y1 = self.y;
                        let x2 = x1 + a[1];
                        let y2 = y1 + a[2];
                        self.curve(x1, y1, x2, y2, x2 + last, y2 + a[3]);
                    } else {
                        let x1 = self.x;
                        let y1 = self.y + a[0];
                        let x2 = x1 + a[1];
                        let y2 = y1 + a[2];
                        self.curve(x1, y1, x2, y2, x2 + a[3], y2 + last);
                    }
                    horizontal = !horizontal;
                    i += 4;
                }
            }
            // The following "flex" operators are intended to emit
            // either two curves or a straight line depending on
            // a "flex depth" parameter and the distance from the
            // joining point to the chord connecting the two
            // end points. We always emit the two curves.
            //
            // Spec: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=18>
            Flex => {
                let a = args::<12>(operands, 0)?;
                let dx1 = self.x + a[0];
                let dy1 = self.y + a[1];
                let dx2 = dx1 + a[2];
                let dy2 = dy1 + a[3];
                let dx3 = dx2 + a[4];
                let dy3 = dy2 + a[5];
                let dx4 = dx3 + a[6];
                let dy4 = dy3 + a[7];
                let dx5 = dx4 + a[8];
                let dy5 = dy4 + a[9];
                self.curve(dx1, dy1, dx2, dy2, dx3, dy3);
                self.curve(dx4, dy4, dx5, dy5, dx5 + a[10], dy5 + a[11]);
            }
            HFlex => {
                let a = args::<7>(operands, 0)?;
                let y = self.y;
                let dx1 = self.x + a[0];
                let dx2 = dx1 + a[1];
                let dy2 = y + a[2];
                let dx3 = dx2 + a[3];
                let dx4 = dx3 + a[4];
                let dx5 = dx4 + a[5];
                self.curve(dx1, y, dx2, dy2, dx3, dy2);
                self.curve(dx4, dy2, dx5, y, dx5 + a[6], y);
            }
            HFlex1 => {
                let a = args::<9>(operands, 0)?;
                let y = self.y;
                let dx1 = self.x + a[0];
                let dy1 = y + a[1];
                let dx2 = dx1 + a[2];
                let dy2 = dy1 + a[3];
                let dx3 = dx2 + a[4];
                let dx4 = dx3 + a[5];
                let dx5 = dx4 + a[6];
                let dy5 = dy2 + a[7];
                self.curve(dx1, dy1, dx2, dy2, dx3, dy2);
                self.curve(dx4, dy2, dx5, dy5, dx5 + a[8], y);
            }
            Flex1 => {
                let a = args::<11>(operands, 0)?;
                let (x0, y0) = (self.x, self.y);
                let dx1 = x0 + a[0];
                let dy1 = y0 + a[1];
                let dx2 = dx1 + a[2];
                let dy2 = dy1 + a[3];
                let dx3 = dx2 + a[4];
                let dy3 = dy2 + a[5];
                let dx4 = dx3 + a[6];
                let dy4 = dy3 + a[7];
                let dx5 = dx4 + a[8];
                let dy5 = dy4 + a[9];
                let (x6, y6) = if (dx5 - x0).abs() > (dy5 - y0).abs() {
                    (dx5 + a[10], y0)
                } else {
                    (x0, dy5 + a[10])
                };
                self.curve(dx1, dy1, dx2, dy2, dx3, dy3);
                self.curve(dx4, dy4, dx5, dy5, x6, y6);
            }
            EndChar => {
                if self.is_open {
                    self.is_open = false;
                    self.sink.close();
                }
            }
            // never recorded
            CallSubr | Return | CallGsubr | DotSection | And | Or | Not | Abs | Add | Sub
            | Div | Neg | Eq | Drop | Put | Get | IfElse | Random | Mul | Sqrt | Dup | Exch
            | Index | Roll => {}
        }
        Ok(())
    }
}

/// PostScript Type2 charstring operator.
///
/// See "Appendix A Type 2 Charstring Command Codes" at
/// <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=31>
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Operator {
    HStem,
    VStem,
    VMoveTo,
    RLineTo,
    HLineTo,
    VLineTo,
    RrCurveTo,
    CallSubr,
    Return,
    EndChar,
    HStemHm,
    HintMask,
    CntrMask,
    RMoveTo,
    HMoveTo,
    VStemHm,
    RCurveLine,
    RLineCurve,
    VvCurveTo,
    HhCurveTo,
    CallGsubr,
    VhCurveTo,
    HvCurveTo,
    DotSection,
    And,
    Or,
    Not,
    Abs,
    Add,
    Sub,
    Div,
    Neg,
    Eq,
    Drop,
    Put,
    Get,
    IfElse,
    Random,
    Mul,
    Sqrt,
    Dup,
    Exch,
    Index,
    Roll,
    HFlex,
    Flex,
    HFlex1,
    Flex1,
}

impl Operator {
    fn read(cursor: &mut Cursor, b0: u8) -> Result<Self, Error> {
        // Escape opcode for accessing two byte operators
        const ESCAPE: u8 = 12;
        let (opcode, operator) = if b0 == ESCAPE {
            let b1 = cursor.read::<u8>()?;
            (b1, Self::from_two_byte_opcode(b1))
        } else {
            (b0, Self::from_opcode(b0))
        };
        operator.ok_or(Error::InvalidCharstringOperator(opcode))
    }

    /// Creates an operator from the given opcode.
    fn from_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            1 => HStem,
            3 => VStem,
            4 => VMoveTo,
            5 => RLineTo,
            6 => HLineTo,
            7 => VLineTo,
            8 => RrCurveTo,
            10 => CallSubr,
            11 => Return,
            14 => EndChar,
            18 => HStemHm,
            19 => HintMask,
            20 => CntrMask,
            21 => RMoveTo,
            22 => HMoveTo,
            23 => VStemHm,
            24 => RCurveLine,
            25 => RLineCurve,
            26 => VvCurveTo,
            27 => HhCurveTo,
            29 => CallGsubr,
            30 => VhCurveTo,
            31 => HvCurveTo,
            _ => return None,
        })
    }

    /// Creates an operator from the given extended opcode.
    ///
    /// These are preceded by a byte containing the escape value of 12.
    fn from_two_byte_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            0 => DotSection,
            3 => And,
            4 => Or,
            5 => Not,
            9 => Abs,
            10 => Add,
            11 => Sub,
            12 => Div,
            14 => Neg,
            15 => Eq,
            18 => Drop,
            20 => Put,
            21 => Get,
            22 => IfElse,
            23 => Random,
            24 => Mul,
            26 => Sqrt,
            27 => Dup,
            28 => Exch,
            29 => Index,
            30 => Roll,
            34 => HFlex,
            35 => Flex,
            36 => HFlex1,
            37 => Flex1,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeface_test_data::cff::{self, op, CharstringBuilder};
    use typeface_test_data::fonts;

    #[derive(Copy, Clone, PartialEq, Debug)]
    enum Command {
        MoveTo(Fixed, Fixed),
        LineTo(Fixed, Fixed),
        CurveTo(Fixed, Fixed, Fixed, Fixed, Fixed, Fixed),
        Close,
        HStem(Fixed, Fixed),
        HintMask(u8),
    }

    #[derive(PartialEq, Default, Debug)]
    struct CaptureCommandSink(Vec<Command>);

    impl CommandSink for CaptureCommandSink {
        fn move_to(&mut self, x: Fixed, y: Fixed) {
            self.0.push(Command::MoveTo(x, y))
        }

        fn line_to(&mut self, x: Fixed, y: Fixed) {
            self.0.push(Command::LineTo(x, y))
        }

        fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed) {
            self.0.push(Command::CurveTo(cx0, cy0, cx1, cy1, x, y))
        }

        fn close(&mut self) {
            self.0.push(Command::Close)
        }

        fn hstem(&mut self, y0: Fixed, y1: Fixed) {
            self.0.push(Command::HStem(y0, y1))
        }

        fn hint_mask(&mut self, mask: &[u8]) {
            self.0.push(Command::HintMask(mask[0]))
        }
    }

    fn f(value: i32) -> Fixed {
        Fixed::from_i32(value)
    }

    fn move_to(x: i32, y: i32) -> Command {
        Command::MoveTo(f(x), f(y))
    }

    fn line_to(x: i32, y: i32) -> Command {
        Command::LineTo(f(x), f(y))
    }

    fn curve_to(coords: [i32; 6]) -> Command {
        let [a, b, c, d, e, g] = coords.map(f);
        Command::CurveTo(a, b, c, d, e, g)
    }

    struct Subrs {
        global: Vec<u8>,
        local: Vec<u8>,
    }

    impl Subrs {
        fn from_spec() -> Self {
            let spec = fonts::cff_spec();
            let global: Vec<&[u8]> = spec.global_subrs.iter().map(Vec::as_slice).collect();
            let local: Vec<&[u8]> = spec.private.subrs.iter().map(Vec::as_slice).collect();
            Self {
                global: cff::index(&global),
                local: cff::index(&local),
            }
        }

        fn global(&self) -> Index {
            Index::new(&self.global).unwrap()
        }

        fn local(&self) -> Option<Index> {
            Some(Index::new(&self.local).unwrap())
        }
    }

    fn run(charstring: &[u8]) -> (Vec<Command>, Option<Fixed>) {
        let subrs = Subrs::from_spec();
        let mut sink = CaptureCommandSink::default();
        let width = evaluate(charstring, subrs.global(), subrs.local(), &mut sink).unwrap();
        (sink.0, width)
    }

    #[test]
    fn stem_width_and_hint_mask() {
        let (commands, width) = run(&fonts::cff_charstrings()[0]);
        assert_eq!(width, Some(f(100)));
        assert_eq!(
            commands,
            [
                Command::HStem(f(0), f(50)),
                Command::HintMask(0x80),
                move_to(50, 0),
                line_to(450, 0),
                line_to(450, 700),
                line_to(50, 700),
                Command::Close,
            ]
        );
    }

    #[test]
    fn local_subr_without_width() {
        let (commands, width) = run(&fonts::cff_charstrings()[1]);
        assert_eq!(width, None);
        assert_eq!(
            commands,
            [
                move_to(100, 100),
                line_to(300, 100),
                line_to(300, 300),
                Command::Close
            ]
        );
    }

    #[test]
    fn global_subr_after_width() {
        let (commands, width) = run(&fonts::cff_charstrings()[2]);
        assert_eq!(width, Some(f(200)));
        assert_eq!(
            commands,
            [
                move_to(0, 0),
                curve_to([100, 0, 200, 100, 200, 200]),
                Command::Close
            ]
        );
    }

    #[test]
    fn width_from_subroutine_is_kept() {
        // the width is read inside a subroutine and not again on return
        let (commands, width) = run(&fonts::cff_charstrings()[4]);
        assert_eq!(width, Some(f(50)));
        assert_eq!(
            commands,
            [move_to(100, 100), line_to(110, 100), Command::Close]
        );
    }

    #[test]
    fn endchar_width() {
        let charstring = CharstringBuilder::new().num(-20).op(op::ENDCHAR).build();
        let (commands, width) = run(&charstring);
        assert!(commands.is_empty());
        assert_eq!(width, Some(f(-20)));
    }

    #[test]
    fn width_only_read_once() {
        // the second moveto has an odd operand count but is not a width
        let charstring = CharstringBuilder::new()
            .nums(&[10, 0, 0])
            .op(op::RMOVETO)
            .nums(&[5, 1])
            .op(op::HMOVETO)
            .op(op::ENDCHAR)
            .build();
        let parsed = Charstring::parse(
            &charstring,
            Index::default(),
            None,
        )
        .unwrap();
        assert_eq!(parsed.width(), Some(f(10)));
        // the hmoveto keeps both operands; only the first is used
        assert_eq!(parsed.operations()[1].operands, [f(5), f(1)]);
    }

    #[test]
    fn width_slot_closes_after_first_stem() {
        // the hints carry no width, so the odd moveto later is not one
        let charstring = CharstringBuilder::new()
            .nums(&[0, 50])
            .op(op::HSTEM)
            .nums(&[10, 0, 0])
            .op(op::RMOVETO)
            .op(op::ENDCHAR)
            .build();
        let parsed = Charstring::parse(&charstring, Index::default(), None).unwrap();
        assert_eq!(parsed.width(), None);
        assert_eq!(parsed.operations()[1].operands, [f(10), f(0), f(0)]);
        // same for a leading hintmask with an empty stack
        let charstring = CharstringBuilder::new()
            .op(op::HINTMASK)
            .nums(&[5, 0])
            .op(op::RMOVETO)
            .op(op::ENDCHAR)
            .build();
        let parsed = Charstring::parse(&charstring, Index::default(), None).unwrap();
        assert_eq!(parsed.width(), None);
        assert_eq!(parsed.operations()[1].operands, [f(5), f(0)]);
    }

    #[test]
    fn hv_curve_alternation() {
        let charstring = CharstringBuilder::new()
            .nums(&[0, 0])
            .op(op::RMOVETO)
            .nums(&[10, 20, 30, 40, 50, 60, 70, 80, 5])
            .op(op::HVCURVETO)
            .op(op::ENDCHAR)
            .build();
        let (commands, _) = run(&charstring);
        assert_eq!(
            commands,
            [
                move_to(0, 0),
                curve_to([10, 0, 30, 30, 30, 70]),
                curve_to([30, 120, 90, 190, 170, 195]),
                Command::Close
            ]
        );
    }

    #[test]
    fn vh_curve_with_final_x() {
        let charstring = CharstringBuilder::new()
            .nums(&[0, 0])
            .op(op::RMOVETO)
            .nums(&[10, 20, 30, 40, 7])
            .op(op::VHCURVETO)
            .op(op::ENDCHAR)
            .build();
        let (commands, _) = run(&charstring);
        assert_eq!(
            commands,
            [
                move_to(0, 0),
                curve_to([0, 10, 20, 40, 60, 47]),
                Command::Close
            ]
        );
    }

    #[test]
    fn hv_and_vh_curves_reject_leftover_operands() {
        for operator in [op::HVCURVETO, op::VHCURVETO] {
            for operands in [&[1, 2, 3, 4, 5, 6][..], &[1, 2, 3, 4, 5, 6, 7], &[1, 2]] {
                let charstring = CharstringBuilder::new()
                    .nums(&[0, 0])
                    .op(op::RMOVETO)
                    .nums(operands)
                    .op(operator)
                    .op(op::ENDCHAR)
                    .build();
                let subrs = Subrs::from_spec();
                let mut sink = CaptureCommandSink::default();
                assert_eq!(
                    evaluate(&charstring, subrs.global(), subrs.local(), &mut sink),
                    Err(Error::InvalidStackAccess(operands.len())),
                    "{operator} {operands:?}"
                );
            }
        }
    }

    #[test]
    fn hh_and_vv_curves() {
        let charstring = CharstringBuilder::new()
            .nums(&[0, 0])
            .op(op::RMOVETO)
            .nums(&[5, 10, 20, 30, 40])
            .op(op::HHCURVETO)
            .nums(&[3, 10, 20, 30, 40])
            .op(op::VVCURVETO)
            .op(op::ENDCHAR)
            .build();
        let (commands, _) = run(&charstring);
        assert_eq!(
            commands,
            [
                move_to(0, 0),
                curve_to([10, 5, 30, 35, 70, 35]),
                curve_to([73, 45, 93, 75, 93, 115]),
                Command::Close
            ]
        );
    }

    #[test]
    fn curve_line_and_line_curve() {
        let charstring = CharstringBuilder::new()
            .nums(&[0, 0])
            .op(op::RMOVETO)
            .nums(&[1, 2, 3, 4, 5, 6, 10, 0])
            .op(op::RCURVELINE)
            .nums(&[0, 10, 1, 2, 3, 4, 5, 6])
            .op(op::RLINECURVE)
            .op(op::ENDCHAR)
            .build();
        let (commands, _) = run(&charstring);
        assert_eq!(
            commands,
            [
                move_to(0, 0),
                curve_to([1, 2, 4, 6, 9, 12]),
                line_to(19, 12),
                line_to(19, 22),
                curve_to([20, 24, 23, 28, 28, 34]),
                Command::Close
            ]
        );
    }

    #[test]
    fn flex_variants_emit_two_curves() {
        let charstring = CharstringBuilder::new()
            .nums(&[0, 0])
            .op(op::RMOVETO)
            .nums(&[10, 0, 10, 10, 10, 0, 10, 0, 10, -10, 10, 0, 50])
            .escape(op::FLEX)
            .nums(&[10, 10, 10, 10, 10, 10, 10])
            .escape(op::HFLEX)
            .op(op::ENDCHAR)
            .build();
        let (commands, _) = run(&charstring);
        assert_eq!(
            commands,
            [
                move_to(0, 0),
                curve_to([10, 0, 20, 10, 30, 10]),
                curve_to([40, 10, 50, 0, 60, 0]),
                curve_to([70, 0, 80, 10, 90, 10]),
                curve_to([100, 10, 110, 0, 120, 0]),
                Command::Close
            ]
        );
    }

    #[test]
    fn flex1_final_axis() {
        // horizontal displacement dominates; the final delta applies to x
        // and y returns to the start
        let horizontal = CharstringBuilder::new()
            .nums(&[0, 0])
            .op(op::RMOVETO)
            .nums(&[10, 1, 10, 1, 10, 1, 10, -1, 10, -1, 10])
            .escape(op::FLEX1)
            .op(op::ENDCHAR)
            .build();
        let (commands, _) = run(&horizontal);
        assert_eq!(
            commands[2],
            curve_to([40, 2, 50, 1, 60, 0])
        );
        // vertical displacement dominates; the final delta applies to y
        // and x returns to the start
        let vertical = CharstringBuilder::new()
            .nums(&[0, 0])
            .op(op::RMOVETO)
            .nums(&[1, 10, 1, 10, 1, 10, -1, 10, -1, 10, 10])
            .escape(op::FLEX1)
            .op(op::ENDCHAR)
            .build();
        let (commands, _) = run(&vertical);
        assert_eq!(
            commands[2],
            curve_to([2, 40, 1, 50, 0, 60])
        );
    }

    #[test]
    fn each_moveto_closes_previous_subpath() {
        let charstring = CharstringBuilder::new()
            .nums(&[0, 0])
            .op(op::RMOVETO)
            .nums(&[10, 10])
            .op(op::HLINETO)
            .num(100)
            .op(op::VMOVETO)
            .nums(&[-10])
            .op(op::VLINETO)
            .op(op::ENDCHAR)
            .build();
        let (commands, _) = run(&charstring);
        assert_eq!(
            commands,
            [
                move_to(0, 0),
                line_to(10, 0),
                line_to(10, 10),
                Command::Close,
                move_to(10, 110),
                line_to(10, 100),
                Command::Close
            ]
        );
    }

    #[test]
    fn arithmetic() {
        let charstring = CharstringBuilder::new()
            // (3 + 4) * 2 = 14
            .nums(&[3, 4])
            .escape(op::ADD)
            .num(2)
            .escape(24)
            // 10 / 4 = 2.5
            .nums(&[10, 4])
            .escape(op::DIV)
            .op(op::RMOVETO)
            // 1 2 exch -> 2 1; 2 - 1 = 1; neg -> -1
            .nums(&[1, 2])
            .escape(op::EXCH)
            .escape(op::SUB)
            .escape(op::NEG)
            .escape(op::DUP)
            .op(op::RLINETO)
            .op(op::ENDCHAR)
            .build();
        let (commands, _) = run(&charstring);
        assert_eq!(
            commands,
            [
                Command::MoveTo(f(14), Fixed::from_f64(2.5)),
                Command::LineTo(f(13), Fixed::from_f64(1.5)),
                Command::Close
            ]
        );
    }

    #[test]
    fn storage_and_conditionals() {
        let charstring = CharstringBuilder::new()
            // store 42 in slot 3
            .nums(&[42, 3])
            .escape(20)
            // 1 2 5 6 ifelse -> 1
            .nums(&[1, 2, 5, 6])
            .escape(22)
            // get slot 3
            .num(3)
            .escape(21)
            // 7 8 9, index 2 -> 7; roll 3 elements by 1
            .op(op::RMOVETO)
            .nums(&[7, 8, 9, 2])
            .escape(op::INDEX)
            .nums(&[3, 1])
            .escape(op::ROLL)
            // drop the 7 that rolled to the top
            .escape(18)
            .op(op::RLINETO)
            .op(op::ENDCHAR)
            .build();
        let parsed = Charstring::parse(&charstring, Index::default(), None).unwrap();
        assert_eq!(parsed.operations()[0].operands, [f(1), f(42)]);
        // 7 8 9 7 -> roll top 3 -> 7 7 8 9 -> drop -> 7 7 8
        assert_eq!(parsed.operations()[1].operands, [f(7), f(7), f(8)]);
    }

    #[test]
    fn random_is_unsupported() {
        let charstring = CharstringBuilder::new().escape(23).build();
        assert_eq!(
            Charstring::parse(&charstring, Index::default(), None),
            Err(Error::UnsupportedCharstringOperator("random"))
        );
    }

    #[test]
    fn invalid_operator() {
        assert_eq!(
            Charstring::parse(&[2], Index::default(), None),
            Err(Error::InvalidCharstringOperator(2))
        );
    }

    #[test]
    fn missing_subroutines() {
        let charstring = CharstringBuilder::new()
            .num(0)
            .op(op::CALLSUBR)
            .build();
        assert_eq!(
            Charstring::parse(&charstring, Index::default(), None),
            Err(Error::MissingSubroutines)
        );
    }

    #[test]
    fn invalid_subroutine_index() {
        let subrs = Subrs::from_spec();
        let charstring = CharstringBuilder::new()
            .num(5)
            .op(op::CALLGSUBR)
            .build();
        assert_eq!(
            Charstring::parse(&charstring, subrs.global(), None),
            Err(Error::InvalidSubroutineIndex(112))
        );
    }

    #[test]
    fn nesting_depth_limit() {
        // subroutine 0 calls itself forever
        let recursive = CharstringBuilder::new()
            .num(-107)
            .op(op::CALLSUBR)
            .build();
        let subrs = cff::index(&[recursive.as_slice()]);
        let charstring = CharstringBuilder::new()
            .num(-107)
            .op(op::CALLSUBR)
            .build();
        assert_eq!(
            Charstring::parse(
                &charstring,
                Index::default(),
                Some(Index::new(&subrs).unwrap())
            ),
            Err(Error::CharstringNestingDepthLimitExceeded)
        );
    }

    #[test]
    fn endchar_in_subroutine_stops_evaluation() {
        let subr = CharstringBuilder::new()
            .nums(&[0, 0])
            .op(op::RMOVETO)
            .op(op::ENDCHAR)
            .build();
        let subrs = cff::index(&[subr.as_slice()]);
        // the trailing rlineto is never reached
        let charstring = CharstringBuilder::new()
            .num(-107)
            .op(op::CALLSUBR)
            .nums(&[10, 10])
            .op(op::RLINETO)
            .build();
        let parsed = Charstring::parse(
            &charstring,
            Index::default(),
            Some(Index::new(&subrs).unwrap()),
        )
        .unwrap();
        assert_eq!(parsed.operations().len(), 2);
        assert_eq!(parsed.operations()[1].operator, Operator::EndChar);
    }

    #[test]
    fn bounds_include_control_points() {
        let subrs = Subrs::from_spec();
        let parsed = Charstring::parse(
            &fonts::cff_charstrings()[2],
            subrs.global(),
            subrs.local(),
        )
        .unwrap();
        let bounds = parsed.bounds().unwrap().unwrap();
        assert_eq!(
            (bounds.x_min, bounds.y_min, bounds.x_max, bounds.y_max),
            (f(0), f(0), f(200), f(200))
        );
        assert_eq!(Charstring::default().bounds().unwrap(), None);
    }
}
