/// Formats every T as `...`, used to keep secrets out of `Debug` output.
pub fn mask_fmt<T>(_: &T, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.write_str("...")
}
