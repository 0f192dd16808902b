//! The various font tables

pub mod cff;
pub mod cmap;
pub mod glyf;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod hvhea;
pub mod hvmtx;
pub mod loca;
pub mod maxp;
pub mod os2;
pub mod post;
pub mod postscript;
pub mod vhea;
pub mod vmtx;
