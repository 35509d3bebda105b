const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// FNV-1a de 32 bits, sin el bit de signo. No usamos `DefaultHasher`
/// porque su salida no está garantizada entre builds.
pub fn ihash(key: &str) -> u32 {
    let mut h = FNV_OFFSET_BASIS;
    for b in key.as_bytes() {
        h ^= *b as u32;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h & 0x7fff_ffff
}

/// Partición de reduce a la que va `key`, en [0, n_reduce).
pub fn partition_for(key: &str, n_reduce: usize) -> usize {
    debug_assert!(n_reduce > 0);
    ihash(key) as usize % n_reduce
}
