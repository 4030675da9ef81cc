//! Texture atlas for glyphs and other small sprites.

pub mod sprite_set;

pub use sprite_set::{
    PageTexture, SpriteData, SpriteHandle, SpriteSet, SpriteSetOpts, SpriteSetStats,
};
