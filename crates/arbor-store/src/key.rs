/// Compose the storage key for an `(id, property)` pair.
///
/// Each component is written netstring style, `{len}:{content}` with the
/// length in bytes, and the two are concatenated:
///
/// ```
/// assert_eq!(arbor_store::key::compose_key("abc", "def"), "3:abc3:def");
/// ```
///
/// The composition is injective over all byte strings. Plain
/// concatenation would alias `("ab", "c")` with `("a", "bc")`. A bare
/// decimal length prefix is not enough either: content that starts with
/// digits bleeds into the length of the next component, so
/// `("1", "ABCDEFGHI3XYZ")` and `("13ABCDEFGHI", "XYZ")` would produce
/// the same key. The `:` terminator removes the ambiguity, because each
/// length is exactly the digit run before the next colon.
pub fn compose_key(id: &str, property: &str) -> String {
    format!("{}:{}{}:{}", id.len(), id, property.len(), property)
}
