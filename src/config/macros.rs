/// Configuration macros for single-declaration config structs
///
/// `config_struct!` takes field name, type and default value in one place and
/// generates:
/// - The struct with public fields
/// - The `Default` implementation with the given values
/// - Serde support with `#[serde(default)]`, so a partial TOML file only needs
///   the keys it overrides
///
/// # Example
/// ```
/// carequeue::config_struct! {
///     pub struct QueueConfig {
///         minutes_per_patient: u32 = 5,
///         seed_default_staff: bool = true,
///     }
/// }
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
