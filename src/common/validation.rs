use rust_decimal::Decimal;
use validator::ValidationError;

/// Texto de auditoria (motivo) aparado; `None` quando ausente ou em branco.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

/// Espaços das pontas removidos e os internos reduzidos a um só.
pub fn tidy(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// "  belo   horizonte " e "BELO HORIZONTE" são a mesma cidade
pub fn normalize_key(raw: &str) -> String {
    tidy(raw).to_uppercase()
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("length");
        err.add_param("min".into(), &1);
        err.message = Some("O campo não pode ficar em branco.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_not_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Correção de valor ")), Some("Correção de valor"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(tidy("  Belo   Horizonte "), "Belo Horizonte");
        assert_eq!(normalize_key("Belo  Horizonte"), normalize_key("BELO HORIZONTE"));
        assert_eq!(normalize_key("São Paulo"), normalize_key("SÃO PAULO"));
    }

    #[test]
    fn test_custom_validators() {
        assert!(validate_not_blank("Betim").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&Decimal::new(-1, 2)).is_err());
    }
}
