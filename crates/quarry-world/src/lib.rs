pub mod block;
pub mod chunk;
pub mod error;
pub mod palette;
pub mod registry;
pub mod section;
pub mod world;

pub use block::Block;
pub use chunk::{Chunk, ChunkEncoding, MIN_Y, SECTION_COUNT};
pub use error::WorldError;
pub use palette::{ContainerKind, PaletteFormat, PalettedContainer};
pub use registry::BlockRegistry;
pub use section::ChunkSection;
pub use world::World;
