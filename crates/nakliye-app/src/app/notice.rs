//! User-facing notifications, one per user action

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// What kind of record a write touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Ticket,
    Truck,
    Facility,
    Organization,
}

impl Subject {
    fn title_case(&self) -> &'static str {
        match self {
            Subject::Ticket => "İş kaydı",
            Subject::Truck => "Araç",
            Subject::Facility => "Depo",
            Subject::Organization => "Cari kayıt",
        }
    }

    // Written out: `to_lowercase` turns the dotted capital İ into i + U+0307
    fn lower_case(&self) -> &'static str {
        match self {
            Subject::Ticket => "iş kaydı",
            Subject::Truck => "araç",
            Subject::Facility => "depo",
            Subject::Organization => "cari kayıt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Create,
    Update,
    Delete,
}

impl WriteAction {
    fn past(&self) -> &'static str {
        match self {
            WriteAction::Create => "eklendi",
            WriteAction::Update => "güncellendi",
            WriteAction::Delete => "silindi",
        }
    }

    fn infinitive(&self) -> &'static str {
        match self {
            WriteAction::Create => "eklemek",
            WriteAction::Update => "güncellemek",
            WriteAction::Delete => "silmek",
        }
    }

    fn progressive(&self) -> &'static str {
        match self {
            WriteAction::Create => "eklenirken",
            WriteAction::Update => "güncellenirken",
            WriteAction::Delete => "silinirken",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(subject: Subject, action: WriteAction) -> Self {
        let title = format!("{} başarıyla {}", subject.title_case(), action.past());
        let message = match action {
            WriteAction::Delete => format!("{}.", title),
            _ => format!(
                "{}. Yeni bir {} {} için tekrar formu kullanabilirsiniz.",
                title,
                subject.lower_case(),
                action.infinitive()
            ),
        };
        Self {
            level: NoticeLevel::Success,
            title,
            message,
        }
    }

    pub fn failure(subject: Subject, action: WriteAction) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: format!(
                "{} {} hata oluştu",
                subject.title_case(),
                action.progressive()
            ),
            message: format!(
                "Malesef {} {} bir hata oluştu. Lütfen tekrar deneyin.",
                subject.lower_case(),
                action.progressive()
            ),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_create_texts() {
        let ok = Notice::success(Subject::Ticket, WriteAction::Create);
        assert_eq!(ok.title, "İş kaydı başarıyla eklendi");
        assert_eq!(
            ok.message,
            "İş kaydı başarıyla eklendi. Yeni bir iş kaydı eklemek için tekrar formu kullanabilirsiniz."
        );

        let err = Notice::failure(Subject::Ticket, WriteAction::Create);
        assert_eq!(err.level, NoticeLevel::Error);
        assert_eq!(err.title, "İş kaydı eklenirken hata oluştu");
        assert_eq!(
            err.message,
            "Malesef iş kaydı eklenirken bir hata oluştu. Lütfen tekrar deneyin."
        );
    }

    #[test]
    fn test_update_and_delete_texts() {
        let err = Notice::failure(Subject::Ticket, WriteAction::Update);
        assert_eq!(err.title, "İş kaydı güncellenirken hata oluştu");

        let ok = Notice::success(Subject::Truck, WriteAction::Update);
        assert_eq!(
            ok.message,
            "Araç başarıyla güncellendi. Yeni bir araç güncellemek için tekrar formu kullanabilirsiniz."
        );

        let ok = Notice::success(Subject::Organization, WriteAction::Delete);
        assert_eq!(ok.message, "Cari kayıt başarıyla silindi.");
    }
}
