use crate::style::{self, HEADING_SIZE};

use data::{Company, Month, Selection};
use iced::widget::{column, container, pick_list, radio, row, text};
use iced::{Alignment, Element};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    CompanySelected(Company),
    MonthSelected(Month),
}

/// Applies one control change; the other half of the selection is kept.
pub fn update(selection: &mut Selection, message: Message) {
    match message {
        Message::CompanySelected(company) => selection.set_company(company),
        Message::MonthSelected(month) => selection.set_month(month),
    }
}

pub fn view<'a>(selection: Selection) -> Element<'a, Message> {
    let companies = Company::ALL.iter().fold(row![].spacing(12), |row, company| {
        row.push(radio(
            company.name(),
            *company,
            Some(selection.company),
            Message::CompanySelected,
        ))
    });

    let month = pick_list(
        Month::ALL,
        Some(selection.month),
        Message::MonthSelected,
    );

    container(
        column![
            column![text("Select Company:").size(HEADING_SIZE), companies].spacing(6),
            row![text("Select Month:").size(HEADING_SIZE), month]
                .spacing(8)
                .align_y(Alignment::Center),
        ]
        .spacing(12),
    )
    .padding(12)
    .style(style::controls_panel)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_change_keeps_month() {
        let mut selection = Selection::new(Company::Apple, Month::March);
        update(&mut selection, Message::CompanySelected(Company::Amazon));

        assert_eq!(selection, Selection::new(Company::Amazon, Month::March));
    }

    #[test]
    fn month_change_keeps_company() {
        let mut selection = Selection::default();
        update(&mut selection, Message::MonthSelected(Month::January));

        assert_eq!(selection, Selection::new(Company::Apple, Month::January));
    }
}
