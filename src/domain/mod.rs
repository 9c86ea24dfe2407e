mod centre;
mod fragment;
mod location;
mod location_name;
mod lookup;

pub use centre::{Centre, CentreError};
pub use fragment::Fragment;
pub use location::{Location, LocationsDocument};
pub use location_name::LocationName;
pub use lookup::LocationLookup;
