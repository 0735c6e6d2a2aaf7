/// Prepares one line for a terminal: drops carriage returns and expands each
/// tab to `tab_width` spaces.
pub fn expand_line(line: &[u8], tab_width: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len());

    for &byte in line {
        match byte {
            b'\r' => {}
            b'\t' => out.extend(std::iter::repeat_n(b' ', tab_width)),
            _ => out.push(byte),
        }
    }

    out
}
