use crate::domain::listing::PropertyListing;
use crate::templates::{
    components::{card, flash_error, number_field, price_label, text_field},
    desktop_layout, Viewer,
};
use maud::{html, Markup};

pub fn listings_page(listings: &[PropertyListing], error: Option<&str>) -> Markup {
    desktop_layout(
        "Listings",
        Viewer::agent(),
        html! {
            main class="container" {
                h1 { "Your listings" }
                (flash_error(error))

                @if listings.is_empty() {
                    p class="muted" { "You haven't listed any properties yet." }
                } @else {
                    table {
                        thead { tr { th { "Title" } th { "Location" } th { "Price" } th {} } }
                        tbody {
                            @for l in listings {
                                tr {
                                    td { (l.title) }
                                    td {
                                        (l.area.as_deref().unwrap_or(""))
                                        @if l.area.is_some() && l.city.is_some() { ", " }
                                        (l.city.as_deref().unwrap_or(""))
                                    }
                                    td { (price_label(l.price)) }
                                    td {
                                        form method="post" action=(format!("/listings/{}/delete", l.id))
                                            onsubmit="return confirm('Delete this listing?');" {
                                            button type="submit" class="link danger" { "Delete" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                (card("Add a property", html! {
                    form method="post" action="/listings" class="stack" {
                        (text_field("title", "Title", "", true))
                        (text_field("city", "City", "", false))
                        (text_field("area", "Area", "", false))
                        label for="price" { "Price *" }
                        input type="number" min="0" id="price" name="price" required;
                        (number_field("bedrooms", "Bedrooms", None))
                        (number_field("bathrooms", "Bathrooms", None))
                        label for="description" { "Description" }
                        textarea id="description" name="description" rows="3" {}
                        button type="submit" class="primary" { "Add listing" }
                    }
                }))
            }
        },
    )
}
