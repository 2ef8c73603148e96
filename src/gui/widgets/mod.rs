use iced::widget::{column, container, row, text};
use iced::{Element, Length};

use crate::detection::ReportEntry;

/// Sidebar on the left, main content on the right.
pub fn layout<'a, Message>(
    sidebar: impl Into<Element<'a, Message>>,
    main_content: impl Into<Element<'a, Message>>,
) -> Element<'a, Message>
where
    Message: 'a,
{
    container(row![
        container(sidebar.into())
            .height(Length::Fill)
            .width(Length::FillPortion(1))
            .style(container::bordered_box),
        container(main_content.into())
            .padding(20)
            .width(Length::FillPortion(4)),
    ])
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}

/// Boxed card for one detection.
pub fn report_card<'a, Message>(entry: &ReportEntry) -> Element<'a, Message>
where
    Message: 'a,
{
    container(
        column![
            text(entry.title()).size(16),
            row![
                text(format!("Class: {}", entry.class_label)),
                text(format!("Confidence: {}", entry.confidence)),
                text(format!("Dimensions: {}", entry.dimensions)),
            ]
            .spacing(30),
            text(format!("Position: {}", entry.position)).size(12),
        ]
        .spacing(6),
    )
    .padding(10)
    .width(Length::Fill)
    .style(container::bordered_box)
    .into()
}

/// Highlighted message box.
pub fn notice<'a, Message>(message: impl Into<String>) -> Element<'a, Message>
where
    Message: 'a,
{
    container(text(message.into()))
        .padding(10)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}
