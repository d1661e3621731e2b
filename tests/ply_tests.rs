use ar_core::ply::parse;
use ar_core::PlyError;

const ASCII: &str = "ply
format ascii 1.0
comment exported for tests
element face 1
property list uchar int vertex_indices
element vertex 2
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
end_header
3 0 1 1
0 0 0 255 0 0
1.5 -2 3 0 255 51
";

fn binary(little_endian: bool) -> Vec<u8> {
    let format = if little_endian {
        "binary_little_endian"
    } else {
        "binary_big_endian"
    };
    let mut out = format!(
        "ply\nformat {} 1.0\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nproperty uchar red\nproperty uchar green\nproperty uchar blue\nend_header\n",
        format
    )
    .into_bytes();
    let rows: [([f32; 3], [u8; 3]); 2] = [([0.0, 0.0, 0.0], [255, 0, 0]), ([1.5, -2.0, 3.0], [0, 255, 51])];
    for (pos, rgb) in rows {
        for v in pos {
            if little_endian {
                out.extend_from_slice(&v.to_le_bytes());
            } else {
                out.extend_from_slice(&v.to_be_bytes());
            }
        }
        out.extend_from_slice(&rgb);
    }
    out
}

#[test]
fn ascii_vertices_and_colours() {
    let cloud = parse(ASCII.as_bytes()).expect("valid ascii ply");
    assert_eq!(cloud.len(), 2);
    assert_eq!(cloud.positions[1], [1.5, -2.0, 3.0]);
    assert_eq!(cloud.colors[0], [1.0, 0.0, 0.0]);
    assert!((cloud.colors[1][2] - 0.2).abs() < 1e-6);
}

#[test]
fn binary_matches_ascii() {
    let ascii = parse(ASCII.as_bytes()).expect("ascii");
    assert_eq!(parse(&binary(true)).expect("little endian"), ascii);
    assert_eq!(parse(&binary(false)).expect("big endian"), ascii);
}

#[test]
fn spherical_dc_colour() {
    let src = "ply
format ascii 1.0
element vertex 2
property float x
property float y
property float z
property float f_dc_0
property float f_dc_1
property float f_dc_2
property float opacity
end_header
0 0 0 0 0 0 1
0 0 0 1 -10 10 1
";
    let cloud = parse(src.as_bytes()).expect("splat ply");
    assert_eq!(cloud.colors[0], [0.5, 0.5, 0.5]);
    let c = cloud.colors[1];
    assert!((c[0] - 0.782_094_8).abs() < 1e-5);
    assert_eq!(c[1], 0.0, "clamped low");
    assert_eq!(c[2], 1.0, "clamped high");
}

#[test]
fn missing_colour_is_white() {
    let src = "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nproperty float z\nend_header\n1 2 3\n";
    let cloud = parse(src.as_bytes()).expect("valid");
    assert_eq!(cloud.colors, vec![[1.0, 1.0, 1.0]]);
}

#[test]
fn interleaved_and_bounds() {
    let cloud = parse(ASCII.as_bytes()).expect("valid");
    let v = cloud.interleaved();
    assert_eq!(v.len(), 12);
    assert_eq!(&v[6..9], &[1.5, -2.0, 3.0]);
    let (lo, hi) = cloud.bounds().expect("non-empty");
    assert_eq!(lo.to_array(), [0.0, -2.0, 0.0]);
    assert_eq!(hi.to_array(), [1.5, 0.0, 3.0]);
}

#[test]
fn malformed_files() {
    assert_eq!(parse(b"solid cube"), Err(PlyError::BadMagic));
    assert_eq!(
        parse(b"ply\nformat ascii 1.0\nelement vertex 1\n"),
        Err(PlyError::UnterminatedHeader)
    );
    assert!(matches!(
        parse(b"ply\nformat binary_middle_endian 1.0\nend_header\n"),
        Err(PlyError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        parse(b"ply\nformat ascii 1.0\nelement vertex 1\nproperty quad x\nend_header\n"),
        Err(PlyError::UnknownType(_))
    ));
    assert_eq!(
        parse(b"ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nend_header\n1 2\n"),
        Err(PlyError::MissingProperty("z"))
    );
    assert_eq!(
        parse(b"ply\nformat ascii 1.0\nelement face 0\nend_header\n"),
        Err(PlyError::MissingVertexElement)
    );
    assert!(matches!(
        parse(b"ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nproperty float z\nend_header\n1 oops 3\n"),
        Err(PlyError::InvalidValue(_))
    ));
}

#[test]
fn truncated_bodies() {
    let mut bytes = binary(true);
    bytes.truncate(bytes.len() - 2);
    assert_eq!(parse(&bytes), Err(PlyError::Truncated));

    let short = "ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nend_header\n1 2 3\n4 5\n";
    assert_eq!(parse(short.as_bytes()), Err(PlyError::Truncated));
}

#[test]
fn empty_elements_with_huge_counts_are_skipped() {
    let text = format!(
        "ply\nformat ascii 1.0\nelement junk {}\nelement vertex 1\nproperty float x\nproperty float y\nproperty float z\nend_header\n1 2 3\n",
        usize::MAX
    );
    let cloud = parse(text.as_bytes()).expect("junk rows carry no data");
    assert_eq!(cloud.len(), 1);
}
