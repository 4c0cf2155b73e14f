use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except the characters `encodeURIComponent` leaves alone.
/// Slashes are encoded too: both hosted-VCS file APIs take the repository
/// path as a single URL segment.
const PATH_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub(crate) fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH_COMPONENT).to_string()
}
