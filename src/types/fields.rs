//! Field-name lookup tables between the SDK's snake_case and the server's camelCase.

/// snake_case aliases accepted for TradeContract write payloads.
pub const TRADE_FIELD_ALIASES: &[(&str, &str)] = &[
    ("contract_no", "contractNo"),
    ("contract_type", "contractType"),
    ("seller_id", "sellerId"),
    ("buyer_id", "buyerId"),
    ("blockchain_status", "blockchainStatus"),
    ("payment_terms", "paymentTerms"),
    ("shipment_date", "shipmentDate"),
    ("origin_country", "originCountry"),
    ("destination_country", "destinationCountry"),
    ("unit_price", "unitPrice"),
    ("total_value", "totalValue"),
];

/// Trade fields copied out of an extraction result, as `(server key, snake_case alias)`.
pub const EXTRACTED_TRADE_FIELDS: &[(&str, &str)] = &[
    ("contractNo", "contract_no"),
    ("contractType", "contract_type"),
    ("commodity", "commodity"),
    ("quantity", "quantity"),
    ("unit", "unit"),
    ("unitPrice", "unit_price"),
    ("currency", "currency"),
    ("totalValue", "total_value"),
    ("originCountry", "origin_country"),
    ("destinationCountry", "destination_country"),
    ("shipmentDate", "shipment_date"),
    ("paymentTerms", "payment_terms"),
    ("incoterms", "incoterms"),
    ("description", "description"),
];

/// Map a TradeContract field name to the server's spelling.
///
/// Known snake_case aliases become camelCase; anything else passes through.
pub fn trade_field_name(key: &str) -> &str {
    TRADE_FIELD_ALIASES
        .iter()
        .find(|(snake, _)| *snake == key)
        .map_or(key, |(_, camel)| camel)
}
