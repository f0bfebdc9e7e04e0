//! Hash de códigos promocionales
//!
//! Los códigos nunca se guardan en texto plano: se almacena un hash
//! determinista del código normalizado para impedir la enumeración
//! de códigos desde la base de datos.

/// Calcular el hash de un código promocional.
///
/// El código se normaliza (trim + mayúsculas) antes de hashear para que
/// `verano25`, ` VERANO25 ` y `Verano25` resuelvan al mismo deal.
pub fn promo_code_hash(code: &str, salt: &str) -> String {
    let normalized = code.trim().to_uppercase();
    let digest = md5::compute(format!("{}:{}", salt, normalized));
    format!("{:x}", digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let a = promo_code_hash("VERANO25", "salt");
        let b = promo_code_hash("VERANO25", "salt");
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_is_case_insensitive_on_input() {
        let upper = promo_code_hash("VERANO25", "salt");
        let lower = promo_code_hash("verano25", "salt");
        let padded = promo_code_hash("  Verano25  ", "salt");
        assert_eq!(upper, lower);
        assert_eq!(upper, padded);
    }

    #[test]
    fn test_salt_changes_hash() {
        let a = promo_code_hash("VERANO25", "salt-a");
        let b = promo_code_hash("VERANO25", "salt-b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_is_hex_md5() {
        let h = promo_code_hash("VERANO25", "salt");
        assert_eq!(h.len(), 32);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
