// Compiled into `weft_e2e::dom` and `weft_e2e::ssr`, which supply `Card`
// and the `Out` type of each target.

pub fn card(state: Card) -> Out {
    view! {
        <div class={state.kind.get()} class:active={state.active.get()} style:color={state.tone.get()}>
            <h1 title={state.title.get()}>{state.title.get()}</h1>
            <p>Count: {state.count.get()}</p>
            <button on:click={move |_| state.count.update(|c| *c += 1)}>+</button>
            <ul>{items(state)}</ul>
        </div>
    }
}

fn items(state: Card) -> Vec<Out> {
    state
        .items
        .get()
        .into_iter()
        .map(|item| view! { <li>{item}</li> })
        .collect()
}
