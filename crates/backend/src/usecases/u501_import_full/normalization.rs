use serde_json::Value;

/// Linha canônica de importação FULL.
///
/// O upstream (planilhas e exportações do marketplace) não tem schema
/// estável: o mesmo campo chega como `SKU`/`sku`, `Nome Produto`/`nome`
/// etc. Toda a reconciliação de nomes de campo acontece AQUI, uma única
/// vez; o resto do sistema só vê esta struct.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalFullRow {
    /// Número do envio, quando a própria linha o traz
    pub shipment_number: Option<String>,
    /// Código do anúncio (MLB...)
    pub ml_code: String,
    /// SKU em texto livre do marketplace
    pub sku_text: String,
    /// Nome do produto informado pelo marketplace (apenas exibição)
    pub product_name: Option<String>,
    /// Quantidade enviada
    pub qty: f64,
}

const SHIPMENT_ALIASES: &[&str] = &[
    "shipment_number",
    "shipmentNumber",
    "numero_envio",
    "Número Envio",
    "Numero Envio",
    "envio",
];
const ML_CODE_ALIASES: &[&str] = &["ml_code", "mlCode", "codigo_ml", "Código ML", "Codigo ML"];
const SKU_ALIASES: &[&str] = &["sku", "SKU", "Sku", "sku_text", "SKU Produto"];
const NAME_ALIASES: &[&str] = &["nome", "Nome Produto", "nome_produto", "produto", "titulo"];
const QTY_ALIASES: &[&str] = &["qty", "quantidade", "Qtd", "Quantidade", "q"];

fn string_field(raw: &Value, aliases: &[&str]) -> Option<String> {
    for key in aliases {
        if let Some(v) = raw.get(key) {
            match v {
                Value::String(s) if !s.trim().is_empty() => return Some(s.trim().to_string()),
                Value::Number(n) => return Some(n.to_string()),
                _ => {}
            }
        }
    }
    None
}

fn number_field(raw: &Value, aliases: &[&str]) -> Option<f64> {
    for key in aliases {
        if let Some(v) = raw.get(key) {
            match v {
                Value::Number(n) => return n.as_f64(),
                // planilhas brasileiras usam vírgula decimal
                Value::String(s) => {
                    let parsed = s.trim().replace(',', ".").parse::<f64>();
                    if let Ok(n) = parsed {
                        return Some(n);
                    }
                }
                _ => {}
            }
        }
    }
    None
}

/// Converter uma linha crua em [`CanonicalFullRow`].
pub fn canonical_row(raw: &Value) -> Result<CanonicalFullRow, String> {
    let sku_text =
        string_field(raw, SKU_ALIASES).ok_or_else(|| "linha sem SKU".to_string())?;

    let qty = number_field(raw, QTY_ALIASES)
        .ok_or_else(|| format!("linha {} sem quantidade", sku_text))?;
    if qty <= 0.0 {
        return Err(format!("quantidade inválida para {}", sku_text));
    }

    Ok(CanonicalFullRow {
        shipment_number: string_field(raw, SHIPMENT_ALIASES),
        ml_code: string_field(raw, ML_CODE_ALIASES).unwrap_or_default(),
        sku_text,
        product_name: string_field(raw, NAME_ALIASES),
        qty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_names_pass_through() {
        let row = canonical_row(&json!({
            "shipment_number": "43210987",
            "ml_code": "MLB123",
            "sku": "CAN-300-AZ",
            "nome": "Caneca azul",
            "qty": 5
        }))
        .unwrap();
        assert_eq!(row.shipment_number.as_deref(), Some("43210987"));
        assert_eq!(row.ml_code, "MLB123");
        assert_eq!(row.sku_text, "CAN-300-AZ");
        assert_eq!(row.product_name.as_deref(), Some("Caneca azul"));
        assert!((row.qty - 5.0).abs() < 1e-9);
    }

    #[test]
    fn aliased_spreadsheet_names_are_reconciled() {
        let row = canonical_row(&json!({
            "Número Envio": "43210987",
            "Código ML": "MLB123",
            "SKU": " CAN-300-AZ ",
            "Nome Produto": "Caneca azul 300ml",
            "Qtd": "12"
        }))
        .unwrap();
        assert_eq!(row.shipment_number.as_deref(), Some("43210987"));
        assert_eq!(row.ml_code, "MLB123");
        assert_eq!(row.sku_text, "CAN-300-AZ");
        assert_eq!(row.product_name.as_deref(), Some("Caneca azul 300ml"));
        assert!((row.qty - 12.0).abs() < 1e-9);
    }

    #[test]
    fn comma_decimal_quantity_is_parsed() {
        let row = canonical_row(&json!({ "sku": "X", "quantidade": "3,5" })).unwrap();
        assert!((row.qty - 3.5).abs() < 1e-9);
    }

    #[test]
    fn missing_sku_or_qty_is_an_error() {
        assert!(canonical_row(&json!({ "qty": 1 })).is_err());
        assert!(canonical_row(&json!({ "sku": "X" })).is_err());
        assert!(canonical_row(&json!({ "sku": "X", "qty": 0 })).is_err());
    }
}
