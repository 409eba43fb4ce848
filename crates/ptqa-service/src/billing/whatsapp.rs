//! WhatsApp click-to-chat links for bill reminders and payment receipts.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use ptqa_core::error::AppError;
use ptqa_core::result::AppResult;
use ptqa_core::traits::clock::Clock;
use ptqa_core::types::id::BillId;
use ptqa_database::repositories::{StudentBillRepository, StudentRepository};
use ptqa_entity::money::format_rupiah;
use ptqa_entity::student::{BillStatus, Student, StudentBill};

/// Characters left unescaped in the message text, as a URI component.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// A ready-to-open message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsAppMessage {
    /// Normalised recipient number.
    pub number: String,
    /// Message text.
    pub text: String,
    /// `wa.me` link carrying the text.
    pub link: String,
}

impl WhatsAppMessage {
    /// Build a message for `phone`.
    pub fn new(phone: &str, text: impl Into<String>) -> AppResult<Self> {
        let number = normalize_phone(phone)?;
        let text = text.into();
        let link = wa_link(&number, &text);
        Ok(Self { number, text, link })
    }
}

/// Digits only, with a leading `0` replaced by the `62` country code.
pub fn normalize_phone(phone: &str) -> AppResult<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(AppError::validation("invalid phone"));
    }
    Ok(match digits.strip_prefix('0') {
        Some(rest) => format!("62{rest}"),
        None => digits,
    })
}

/// Click-to-chat link for an already normalised number.
pub fn wa_link(number: &str, text: &str) -> String {
    format!("https://wa.me/{number}?text={}", utf8_percent_encode(text, COMPONENT))
}

/// Indonesian month name of a `YYYY-MM` period, optionally with the year.
/// Unparseable periods are returned as given.
pub fn month_name(period: &str, with_year: bool) -> String {
    let mut parts = period.split('-');
    let (Some(year), Some(month)) = (parts.next(), parts.next()) else {
        return period.to_string();
    };
    let Some(name) = month
        .parse::<usize>()
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|i| MONTHS.get(i))
    else {
        return period.to_string();
    };
    if with_year {
        format!("{name} {year}")
    } else {
        (*name).to_string()
    }
}

/// `18 Oktober 2026`.
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

fn category(bill: &StudentBill) -> &str {
    bill.category_name.as_deref().unwrap_or("Pembayaran")
}

/// Reminder text for an unpaid bill.
pub fn bill_reminder(student: &Student, bill: &StudentBill) -> String {
    format!(
        "Assalamu'alaikum Wr. Wb.\n\n\
         Yth. Wali Santri {name}\n\n\
         Kami sampaikan pengingat pembayaran:\n\n\
         TAGIHAN PEMBAYARAN\n\
         * Nama Santri: {name}\n\
         * Jenis: {category}\n\
         * Periode: {period}\n\
         * Jumlah: {amount}\n\
         * Status: BELUM LUNAS\n\n\
         Mohon segera melakukan pembayaran. Jazakumullah khairan.\n\n\
         Pondok Pesantren Tahfizh Qur'an Al-Usymuni",
        name = student.name,
        category = category(bill),
        period = month_name(&bill.month, false),
        amount = format_rupiah(bill.amount),
    )
}

/// Receipt text for a paid bill, dated `today`.
pub fn payment_receipt(student: &Student, bill: &StudentBill, today: NaiveDate) -> String {
    format!(
        "Assalamu'alaikum Wr. Wb.\n\n\
         Yth. Bapak/Ibu {guardian}\n\n\
         Terima kasih atas pembayaran {category} santri {name}.\n\n\
         BUKTI PEMBAYARAN\n\
         * Jenis: {category}\n\
         * Periode: {period}\n\
         * Jumlah: {amount}\n\
         * Status: LUNAS\n\
         * Tanggal: {date}\n\n\
         Barakallahu fiikum.\n\n\
         Pondok Tahfizh Qur'an Al-Usymuni",
        guardian = student.guardian_name(),
        name = student.name,
        category = category(bill),
        period = month_name(&bill.month, true),
        amount = format_rupiah(bill.amount),
        date = long_date(today),
    )
}

/// Builds guardian messages for student bills.
#[derive(Debug, Clone)]
pub struct BillingMessenger {
    students: Arc<StudentRepository>,
    bills: Arc<StudentBillRepository>,
    clock: Arc<dyn Clock>,
}

impl BillingMessenger {
    /// Creates a messenger over the student repositories.
    pub fn new(
        students: Arc<StudentRepository>,
        bills: Arc<StudentBillRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            students,
            bills,
            clock,
        }
    }

    /// Reminder for an unpaid bill.
    pub async fn reminder(&self, bill_id: &BillId) -> AppResult<WhatsAppMessage> {
        let (student, bill) = self.load(bill_id).await?;
        if bill.status != BillStatus::BelumLunas {
            return Err(AppError::validation(format!("Bill '{bill_id}' is already paid")));
        }
        debug!(%bill_id, student = %student.name, "Building bill reminder");
        WhatsAppMessage::new(student.phone.as_deref().unwrap_or_default(), bill_reminder(&student, &bill))
    }

    /// Receipt for a paid bill.
    pub async fn receipt(&self, bill_id: &BillId) -> AppResult<WhatsAppMessage> {
        let (student, bill) = self.load(bill_id).await?;
        if bill.status != BillStatus::Lunas {
            return Err(AppError::validation(format!("Bill '{bill_id}' is not paid yet")));
        }
        let today = self.clock.now().date_naive();
        debug!(%bill_id, student = %student.name, "Building payment receipt");
        WhatsAppMessage::new(
            student.phone.as_deref().unwrap_or_default(),
            payment_receipt(&student, &bill, today),
        )
    }

    async fn load(&self, bill_id: &BillId) -> AppResult<(Student, StudentBill)> {
        let bill = self
            .bills
            .find_by_id(bill_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Bill '{bill_id}' not found")))?;
        let student = self
            .students
            .find_by_id(&bill.student_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Student '{}' not found", bill.student_id)))?;
        Ok((student, bill))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use ptqa_core::error::ErrorKind;
    use ptqa_core::traits::CollectionAdapter;
    use ptqa_core::traits::clock::ManualClock;
    use ptqa_database::adapters::MemoryCollectionAdapter;

    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("0812-3456-789").unwrap(), "628123456789");
        assert_eq!(normalize_phone("+62 812 3456").unwrap(), "628123456");
        assert_eq!(normalize_phone("  ").unwrap_err().kind, ErrorKind::Validation);
        assert_eq!(normalize_phone("").unwrap_err().kind, ErrorKind::Validation);
    }

    #[test]
    fn test_wa_link_encodes_as_uri_component() {
        assert_eq!(
            wa_link("62812", "Yth. Wali (Ali)\n* Jumlah: Rp 1.000"),
            "https://wa.me/62812?text=Yth.%20Wali%20(Ali)%0A*%20Jumlah%3A%20Rp%201.000"
        );
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name("2024-03", false), "Maret");
        assert_eq!(month_name("2024-12", true), "Desember 2024");
        assert_eq!(month_name("2024-13", false), "2024-13");
        assert_eq!(month_name("Maret", false), "Maret");
        assert_eq!(long_date(NaiveDate::from_ymd_opt(2026, 10, 8).unwrap()), "08 Oktober 2026");
    }

    async fn messenger() -> BillingMessenger {
        let adapter = MemoryCollectionAdapter::new();
        adapter
            .seed(
                "students",
                vec![json!({"id": "s1", "name": "Ali", "parent_name": "Pak Umar", "phone": "0812 345", "status": "Aktif"})],
            )
            .await;
        adapter
            .seed(
                "student_bills",
                vec![
                    json!({"id": "b1", "student_id": "s1", "student_name": "Ali", "category_name": "SPP", "amount": 150000, "month": "2024-03", "status": "Belum Lunas"}),
                    json!({"id": "b2", "student_id": "s1", "student_name": "Ali", "category_name": "SPP", "amount": 150000, "month": "2024-02", "status": "Lunas", "paid_at": "2024-02-05"}),
                ],
            )
            .await;
        let shared: Arc<dyn CollectionAdapter> = Arc::new(adapter);
        BillingMessenger::new(
            Arc::new(StudentRepository::new(Arc::clone(&shared))),
            Arc::new(StudentBillRepository::new(shared)),
            Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 20, 9, 0, 0).unwrap())),
        )
    }

    #[tokio::test]
    async fn test_reminder_and_receipt() {
        let messenger = messenger().await;

        let reminder = messenger.reminder(&BillId::from("b1")).await.unwrap();
        assert_eq!(reminder.number, "62812345");
        assert!(reminder.text.contains("Yth. Wali Santri Ali"));
        assert!(reminder.text.contains("* Periode: Maret\n"));
        assert!(reminder.text.contains("* Jumlah: Rp 150.000"));
        assert!(reminder.link.starts_with("https://wa.me/62812345?text=Assalamu'alaikum%20Wr."));

        let receipt = messenger.receipt(&BillId::from("b2")).await.unwrap();
        assert!(receipt.text.contains("Yth. Bapak/Ibu Pak Umar"));
        assert!(receipt.text.contains("* Periode: Februari 2024"));
        assert!(receipt.text.contains("* Tanggal: 20 Maret 2024"));

        let err = messenger.receipt(&BillId::from("b1")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = messenger.reminder(&BillId::from("missing")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
