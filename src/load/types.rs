//! Common interface for loads assigned to zones.

use crate::schedule::Schedule;

/// A zone load that references schedules and writes itself to IDF.
///
/// This trait lets programs and rooms collect schedules and write loads
/// without matching on each concrete type.
pub trait Load {
    /// Returns the load name, without any zone suffix.
    fn name(&self) -> &str;

    /// Returns a human-readable type name for the load.
    fn load_type(&self) -> &'static str;

    /// Returns every schedule the load references.
    fn schedules(&self) -> Vec<&Schedule>;

    /// Returns the IDF text of the load assigned to `zone_name`.
    ///
    /// # Arguments
    ///
    /// * `zone_name` - Name of the zone the load belongs to
    fn to_idf(&self, zone_name: &str) -> String;
}
