pub mod elevation;
pub mod globe;
pub mod object;
pub mod prefabs;
pub mod ray;
pub mod ray_casting;
pub mod spatial;
pub mod terrain;
pub mod view;
pub mod window;

pub use elevation::*;
pub use globe::*;
pub use object::*;
pub use ray::*;
pub use terrain::*;
pub use view::*;
pub use window::*;
