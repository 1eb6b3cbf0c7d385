//! Brick dimensions and palette

pub const BRICK_UNIT_SIZE: f64 = 1.0;
pub const BRICK_HEIGHT: f64 = BRICK_UNIT_SIZE * 0.8;
pub const PLATE_HEIGHT: f64 = BRICK_HEIGHT / 3.0;
pub const ROAD_HEIGHT: f64 = PLATE_HEIGHT * 0.5;

pub const RED: u32 = 0xc91a09;
pub const BLUE: u32 = 0x0053a0;
pub const YELLOW: u32 = 0xfcc007;
pub const GREEN: u32 = 0x237841;
pub const DARK_GREEN: u32 = 0x008742;
pub const WHITE: u32 = 0xffffff;
pub const GREY: u32 = 0x9ba19d;
pub const DARK_GREY: u32 = 0x6d6e6c;
pub const BROWN: u32 = 0x674127;
pub const TAN: u32 = 0xdec69c;
pub const ORANGE: u32 = 0xfe8a18;
pub const TRANS_CLEAR_BLUE: u32 = 0xadcdef;
