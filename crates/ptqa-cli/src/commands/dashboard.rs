//! Finance summary CLI command.

use ptqa_core::error::AppError;
use ptqa_entity::money::format_rupiah;
use ptqa_service::Application;

use crate::output::{self, OutputFormat};

/// Print the dashboard summary
pub async fn execute(app: &Application, format: OutputFormat) -> Result<(), AppError> {
    app.session.require_principal()?;
    let summary = app.dashboard.summary().await?;

    let recent = summary
        .recent
        .iter()
        .map(|t| {
            format!(
                "{} {} {}",
                t.effective_date().map(|d| d.to_string()).unwrap_or_default(),
                t.category_label(),
                format_rupiah(t.amount)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let fields = [
        ("Total pemasukan", format_rupiah(summary.total_income)),
        ("Total pengeluaran", format_rupiah(summary.total_expense)),
        ("Saldo", format_rupiah(summary.balance)),
        ("Pemasukan bulan ini", format_rupiah(summary.month_income)),
        ("Pengeluaran bulan ini", format_rupiah(summary.month_expense)),
        ("Santri aktif", summary.active_students.to_string()),
        ("Transaksi terakhir", recent),
    ];
    output::print_fields(&summary, &fields, format);
    Ok(())
}
