//! Style declarations, channel serialization and stylesheet reading.

mod channel;
mod model;
mod naming;
mod reader;
mod value;

pub use channel::Channel;
pub use model::Declarations;
pub use model::StyleModel;
pub use naming::kebab_property;
pub use reader::CssRule;
pub use reader::parse_stylesheet;
pub use value::StyleValue;

/// Builds a property list whose values may mix text and numbers.
///
/// ```
/// use dk_css::declarations;
///
/// let props = declarations!["fontSize" => "30px", "padding" => 4];
/// assert_eq!(props.len(), 2);
/// ```
#[macro_export]
macro_rules! declarations {
    () => {
        ::std::vec::Vec::<(::std::string::String, $crate::StyleValue)>::new()
    };
    ($($property:expr => $value:expr),+ $(,)?) => {
        ::std::vec![$((
            ::std::string::String::from($property),
            $crate::StyleValue::from($value),
        )),+]
    };
}
