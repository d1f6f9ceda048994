use crate::domain::model::ContractPricingSnapshot;
use crate::utils::error::{PricingError, Result};

/// 產生給 UI 顯示的價格與分期摘要
pub fn render_preview(snapshot: &ContractPricingSnapshot) -> String {
    let currency = snapshot.currency.as_str();
    let mut lines = Vec::new();

    if !snapshot.is_complete() {
        lines.push(
            "⚠️  Incomplete configuration: check applicant count, currency and template pricing"
                .to_string(),
        );
    }
    lines.push(format!(
        "Applicants: {}  Price per applicant: {} {}",
        snapshot.applicant_count, snapshot.per_applicant_price, currency
    ));
    lines.push(format!("Total: {} {}", snapshot.total_amount, currency));
    if snapshot.archival_research_fee > 0 {
        lines.push(format!(
            "Archival research: {} {}",
            snapshot.archival_research_fee, currency
        ));
    }
    lines.push(format!("Final amount: {} {}", snapshot.final_amount, currency));
    if snapshot.vat_included_in_price {
        lines.push("VAT: included in price".to_string());
    } else if snapshot.include_vat {
        lines.push(format!("VAT: {} {}", snapshot.vat_total(), currency));
    }

    if !snapshot.payment_plan.is_empty() {
        lines.push(String::new());
        lines.push("Payment plan:".to_string());
        lines.extend(snapshot.payment_plan.iter().map(|installment| {
            let vat = if installment.value_vat > 0 {
                format!(" (+{} VAT)", installment.value_vat)
            } else {
                String::new()
            };
            format!(
                "  {:<22} {:>3}%  {}  {} {}{}",
                installment.label,
                installment.percent_of_nominal,
                installment.due_date,
                installment.value,
                installment.currency,
                vat
            )
        }));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// 將付款計畫輸出為 CSV
pub fn payment_plan_csv(snapshot: &ContractPricingSnapshot) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "label",
        "percent_of_nominal",
        "due_date",
        "value",
        "value_vat",
        "currency",
        "notes",
    ])?;
    for installment in &snapshot.payment_plan {
        writer.write_record([
            installment.label.clone(),
            installment.percent_of_nominal.to_string(),
            installment.due_date.to_string(),
            installment.value.to_string(),
            installment.value_vat.to_string(),
            installment.currency.clone(),
            installment.notes.clone(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| PricingError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| PricingError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
