//! Operand stack shared by the DICT parser and the charstring interpreter.

use types::Fixed;

use super::Error;

/// "Operators in Top DICT, Font DICTs, Private DICTs and CharStrings may be
/// preceded by up to a maximum of 513 operands."
const MAX_STACK: usize = 513;

/// A CFF number operand: an integer or a 16.16 fixed point value.
///
/// Operands keep the representation they were encoded with. The operator
/// consuming them decides whether it wants an integer (glyph ids, offsets,
/// counts) or a coordinate.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Number {
    I32(i32),
    Fixed(Fixed),
}

impl Number {
    pub const ZERO: Self = Self::I32(0);

    pub fn to_fixed(self) -> Fixed {
        match self {
            Self::I32(value) => Fixed::from_i32(value),
            Self::Fixed(value) => value,
        }
    }

    /// Fixed point values are truncated toward negative infinity.
    pub fn to_i32(self) -> i32 {
        match self {
            Self::I32(value) => value,
            Self::Fixed(value) => value.to_i32(),
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::I32(value)
    }
}

impl From<Fixed> for Number {
    fn from(value: Fixed) -> Self {
        Self::Fixed(value)
    }
}

/// Bounded operand stack.
///
/// Besides push and pop, this implements the stack manipulation operators
/// of Type2 charstrings (`dup`, `exch`, `index` and `roll`) and the delta
/// decoding used by array valued DICT entries.
pub struct Stack {
    operands: [Number; MAX_STACK],
    len: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            operands: [Number::ZERO; MAX_STACK],
            len: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// An odd operand count before a hint or `endchar` operator means the
    /// advance width sits at the bottom of the stack.
    pub fn len_is_odd(&self) -> bool {
        self.len % 2 == 1
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn push(&mut self, number: impl Into<Number>) -> Result<(), Error> {
        let slot = self
            .operands
            .get_mut(self.len)
            .ok_or(Error::StackOverflow)?;
        *slot = number.into();
        self.len += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Number, Error> {
        self.len = self.len.checked_sub(1).ok_or(Error::StackUnderflow)?;
        Ok(self.operands[self.len])
    }

    pub fn pop_i32(&mut self) -> Result<i32, Error> {
        self.pop().map(Number::to_i32)
    }

    pub fn pop_fixed(&mut self) -> Result<Fixed, Error> {
        self.pop().map(Number::to_fixed)
    }

    /// Returns the integer at `index`, counted from the bottom.
    pub fn get_i32(&self, index: usize) -> Result<i32, Error> {
        self.get(index).map(Number::to_i32)
    }

    /// Returns the coordinate at `index`, counted from the bottom.
    pub fn get_fixed(&self, index: usize) -> Result<Fixed, Error> {
        self.get(index).map(Number::to_fixed)
    }

    fn get(&self, index: usize) -> Result<Number, Error> {
        self.operands[..self.len]
            .get(index)
            .copied()
            .ok_or(Error::InvalidStackAccess(index))
    }

    /// All operands, bottom first, as coordinates.
    pub fn fixed_values(&self) -> impl Iterator<Item = Fixed> + '_ {
        self.operands[..self.len].iter().map(|number| number.to_fixed())
    }

    /// Reads `N` consecutive coordinates starting at `first_index`.
    pub fn fixed_array<const N: usize>(&self, first_index: usize) -> Result<[Fixed; N], Error> {
        let operands = self
            .operands
            .get(first_index..first_index + N)
            .filter(|_| first_index + N <= self.len)
            .ok_or(Error::InvalidStackAccess(first_index + N - 1))?;
        let mut result = [Fixed::ZERO; N];
        for (dest, number) in result.iter_mut().zip(operands) {
            *dest = number.to_fixed();
        }
        Ok(result)
    }

    /// Replaces each operand with the running sum of the operands up to it.
    ///
    /// Blue zones and stem snap widths are stored as differences between
    /// successive values.
    pub fn accumulate_deltas(&mut self) {
        let mut sum = Fixed::ZERO;
        for number in &mut self.operands[..self.len] {
            sum += number.to_fixed();
            *number = Number::Fixed(sum);
        }
    }

    /// Pushes a copy of the top operand.
    pub fn dup(&mut self) -> Result<(), Error> {
        let top = self.len.checked_sub(1).ok_or(Error::StackUnderflow)?;
        self.push(self.operands[top])
    }

    /// Swaps the two topmost operands.
    pub fn exch(&mut self) -> Result<(), Error> {
        if self.len < 2 {
            return Err(Error::StackUnderflow);
        }
        self.operands.swap(self.len - 2, self.len - 1);
        Ok(())
    }

    /// Pushes a copy of the operand `depth` places below the top.
    pub fn index(&mut self, depth: usize) -> Result<(), Error> {
        let index = self
            .len
            .checked_sub(depth + 1)
            .ok_or(Error::InvalidStackAccess(depth))?;
        self.push(self.operands[index])
    }

    /// Rotates the topmost `count` operands by `shift` places toward the
    /// top. Negative shifts rotate toward the bottom.
    pub fn roll(&mut self, count: usize, shift: i32) -> Result<(), Error> {
        let start = self.len.checked_sub(count).ok_or(Error::StackUnderflow)?;
        if count != 0 {
            let shift = shift.rem_euclid(count as i32) as usize;
            self.operands[start..self.len].rotate_right(shift);
        }
        Ok(())
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use types::Fixed;

    use super::{Number, Stack};
    use crate::tables::postscript::Error;

    fn stack_of(values: &[i32]) -> Stack {
        let mut stack = Stack::new();
        for value in values {
            stack.push(*value).unwrap();
        }
        stack
    }

    fn contents(stack: &Stack) -> Vec<i32> {
        (0..stack.len()).map(|i| stack.get_i32(i).unwrap()).collect()
    }

    #[test]
    fn operands_keep_their_encoding() {
        let mut stack = stack_of(&[20]);
        stack.push(Fixed::from_f64(-1.5)).unwrap();
        assert!(!stack.len_is_odd());
        assert_eq!(stack.pop().unwrap(), Number::Fixed(Fixed::from_f64(-1.5)));
        stack.push(Fixed::from_f64(-1.5)).unwrap();
        assert_eq!(stack.pop_i32().unwrap(), -2);
        assert_eq!(stack.pop_fixed().unwrap(), Fixed::from_i32(20));
        assert!(matches!(stack.pop(), Err(Error::StackUnderflow)));
    }

    #[test]
    fn overflow() {
        let mut stack = Stack::new();
        for i in 0..513 {
            stack.push(i).unwrap();
        }
        assert!(matches!(stack.push(0), Err(Error::StackOverflow)));
        assert_eq!(stack.len(), 513);
    }

    #[test]
    fn blue_zone_deltas() {
        let mut stack = stack_of(&[-10, 10, 700, 10]);
        stack.accumulate_deltas();
        let values: Vec<_> = stack.fixed_values().map(Fixed::to_i32).collect();
        assert_eq!(values, [-10, 0, 700, 710]);
    }

    #[test]
    fn roll() {
        let mut stack = stack_of(&[1, 2, 3, 4]);
        stack.roll(3, 1).unwrap();
        assert_eq!(contents(&stack), [1, 4, 2, 3]);
        stack.roll(3, -1).unwrap();
        assert_eq!(contents(&stack), [1, 2, 3, 4]);
        stack.roll(0, 5).unwrap();
        assert!(matches!(stack.roll(5, 1), Err(Error::StackUnderflow)));
    }

    #[test]
    fn dup_exch_index() {
        let mut stack = stack_of(&[1, 2, 3]);
        stack.exch().unwrap();
        assert_eq!(contents(&stack), [1, 3, 2]);
        stack.dup().unwrap();
        assert_eq!(contents(&stack), [1, 3, 2, 2]);
        stack.index(3).unwrap();
        assert_eq!(contents(&stack), [1, 3, 2, 2, 1]);
        assert!(matches!(
            stack.index(5),
            Err(Error::InvalidStackAccess(5))
        ));
        let mut empty = Stack::new();
        assert!(matches!(empty.dup(), Err(Error::StackUnderflow)));
        assert!(matches!(
            stack_of(&[1]).exch(),
            Err(Error::StackUnderflow)
        ));
    }

    #[test]
    fn fixed_array_bounds() {
        let stack = stack_of(&[1, 2]);
        assert_eq!(
            stack.fixed_array::<2>(0).unwrap(),
            [Fixed::from_i32(1), Fixed::from_i32(2)]
        );
        assert!(matches!(
            stack.fixed_array::<2>(1),
            Err(Error::InvalidStackAccess(2))
        ));
    }
}
