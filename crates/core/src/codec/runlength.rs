//! RunLength (PackBits) stream codec.

/// Decode RunLength-encoded data.
///
/// Format:
/// - Length byte 0-127: copy the next (length + 1) bytes literally
/// - Length byte 128: end of data
/// - Length byte 129-255: repeat the next byte (257 - length) times
///
/// Truncated input is tolerated: a run cut short by the end of the data
/// contributes the bytes that are present and decoding stops.
pub fn rldecode(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len() * 2);
    let mut i = 0;

    while i < data.len() {
        let length = data[i];
        i += 1;

        match length {
            128 => break,
            0..=127 => {
                let end = (i + length as usize + 1).min(data.len());
                result.extend_from_slice(&data[i..end]);
                i = end;
            }
            129..=255 => {
                let Some(&byte) = data.get(i) else { break };
                i += 1;
                result.extend(std::iter::repeat_n(byte, 257 - length as usize));
            }
        }
    }

    result
}

/// Encode data with RunLength, ending with the 128 end-of-data byte.
///
/// Runs of three or more equal bytes become repeat records; everything else
/// is grouped into literal records of up to 128 bytes.
pub fn rlencode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / 128 + 2);
    let mut literal_start = 0;
    let mut i = 0;

    while i < data.len() {
        let byte = data[i];
        let run = data[i..].iter().take(128).take_while(|&&b| b == byte).count();
        if run >= 3 {
            flush_literal(&data[literal_start..i], &mut out);
            out.push((257 - run) as u8);
            out.push(byte);
            i += run;
            literal_start = i;
        } else {
            i += run;
        }
    }
    flush_literal(&data[literal_start..], &mut out);
    out.push(128);
    out
}

fn flush_literal(bytes: &[u8], out: &mut Vec<u8>) {
    for chunk in bytes.chunks(128) {
        out.push((chunk.len() - 1) as u8);
        out.extend_from_slice(chunk);
    }
}
